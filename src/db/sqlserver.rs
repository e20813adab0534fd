use std::borrow::Cow;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use tiberius::{AuthMethod, Client, ColumnData, Config, FromSql, ToSql};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use super::{DbError, QueryExecutor, Row, SqlParam, SqlValue};
use crate::config::DbSettings;

/// TDS executor that opens one connection per statement.
pub struct SqlServer {
    settings: DbSettings,
}

impl SqlServer {
    pub fn new(settings: DbSettings) -> Self {
        log::info!("SharePoint DB initialized for server: {}", settings.server);
        SqlServer { settings }
    }

    fn config(&self) -> Config {
        let s = &self.settings;
        let mut config = Config::new();
        config.host(&s.server);
        config.port(s.port);
        config.database(&s.database);
        config.authentication(AuthMethod::sql_server(&s.username, &s.password));
        if s.trust_cert {
            config.trust_cert();
        }
        config
    }

    async fn connect(&self) -> Result<Client<Compat<TcpStream>>, DbError> {
        let config = self.config();
        let addr = config.get_addr();
        let open = async {
            let tcp = TcpStream::connect(addr)
                .await
                .map_err(|e| DbError::Connect(e.to_string()))?;
            tcp.set_nodelay(true)
                .map_err(|e| DbError::Connect(e.to_string()))?;
            Client::connect(config, tcp.compat_write())
                .await
                .map_err(|e| DbError::Connect(e.to_string()))
        };
        tokio::time::timeout(self.settings.timeout, open)
            .await
            .map_err(|_| DbError::Timeout(self.settings.timeout))?
            .inspect_err(|e| log::error!("Database connection error: {e}"))
    }
}

#[async_trait]
impl QueryExecutor for SqlServer {
    async fn fetch_all(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>, DbError> {
        // Dropping the client closes the socket, so early returns below
        // release the connection as well.
        let mut client = self.connect().await?;

        let bound: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
        let stream = client
            .query(sql, &bound)
            .await
            .map_err(|e| DbError::Query(e.to_string()))?;
        let raw = stream
            .into_first_result()
            .await
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows = raw.into_iter().map(map_row).collect();

        if let Err(e) = client.close().await {
            log::warn!("Error closing connection: {e}");
        }
        Ok(rows)
    }
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> ColumnData<'_> {
        match self {
            SqlParam::Null => ColumnData::String(None),
            SqlParam::Int(v) => ColumnData::I64(Some(*v)),
            SqlParam::Int32(v) => ColumnData::I32(Some(*v)),
            SqlParam::Text(v) => ColumnData::String(Some(Cow::Borrowed(v.as_str()))),
        }
    }
}

fn map_row(row: tiberius::Row) -> Row {
    let names: Vec<String> = row.columns().iter().map(|c| c.name().to_string()).collect();
    let mut mapped = Row::new();
    for (name, data) in names.iter().zip(row) {
        mapped.push(name, convert(data));
    }
    mapped
}

fn convert(data: ColumnData<'static>) -> SqlValue {
    match data {
        ColumnData::U8(v) => v.map_or(SqlValue::Null, |v| SqlValue::Int(v.into())),
        ColumnData::I16(v) => v.map_or(SqlValue::Null, |v| SqlValue::Int(v.into())),
        ColumnData::I32(v) => v.map_or(SqlValue::Null, |v| SqlValue::Int(v.into())),
        ColumnData::I64(v) => v.map_or(SqlValue::Null, SqlValue::Int),
        ColumnData::F32(v) => v.map_or(SqlValue::Null, |v| SqlValue::Float(v.into())),
        ColumnData::F64(v) => v.map_or(SqlValue::Null, SqlValue::Float),
        ColumnData::Bit(v) => v.map_or(SqlValue::Null, SqlValue::Bool),
        ColumnData::String(v) => v.map_or(SqlValue::Null, |s| SqlValue::Text(s.into_owned())),
        ColumnData::Guid(v) => v.map_or(SqlValue::Null, |g| SqlValue::Text(g.to_string())),
        ColumnData::Binary(v) => v.map_or(SqlValue::Null, |b| SqlValue::Binary(hex::encode(b))),
        ColumnData::Numeric(v) => v.map_or(SqlValue::Null, |n| {
            SqlValue::Float(n.value() as f64 / 10f64.powi(i32::from(n.scale())))
        }),
        ColumnData::Xml(v) => {
            v.map_or(SqlValue::Null, |x| SqlValue::Text(x.into_owned().into_string()))
        }
        ColumnData::Time(_) => match NaiveTime::from_sql(&data) {
            Ok(Some(t)) => SqlValue::Text(t.format("%H:%M:%S").to_string()),
            _ => SqlValue::Null,
        },
        ColumnData::Date(_) => match NaiveDate::from_sql(&data) {
            Ok(Some(d)) => d
                .and_hms_opt(0, 0, 0)
                .map_or(SqlValue::Null, SqlValue::DateTime),
            _ => SqlValue::Null,
        },
        ColumnData::DateTimeOffset(_) => match DateTime::<FixedOffset>::from_sql(&data) {
            Ok(Some(dt)) => SqlValue::DateTime(dt.naive_local()),
            _ => SqlValue::Null,
        },
        other => match NaiveDateTime::from_sql(&other) {
            Ok(Some(dt)) => SqlValue::DateTime(dt),
            _ => SqlValue::Null,
        },
    }
}
