//! Schema probe for the SharePoint content tables this dashboard reads.
//!
//! SharePoint does not document its content database, and column layouts
//! shift between versions. The probe reports, per known table, whether it
//! can be read, how many rows it holds and which columns it exposes, so a
//! deployment can be checked against the column mapping used by the reports.

use serde::Serialize;

use crate::db::{Database, SqlParam};

/// Tables the reports depend on. Only these names are ever interpolated into
/// probe statements.
pub const KNOWN_TABLES: &[&str] = &["AllLists", "AllUserData", "UserInfo", "AllDocs", "Webs"];

#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub max_length: Option<i64>,
    pub nullable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableProbe {
    pub table: String,
    pub accessible: bool,
    pub row_count: i64,
    pub columns: Vec<ColumnInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Probe one table. Failures are captured in the result rather than returned,
/// so one unreadable table does not hide the others.
pub async fn probe_table(db: &Database, table: &'static str) -> TableProbe {
    let count_sql = format!("SELECT COUNT(*) AS cnt FROM {table} WITH (NOLOCK)");
    let row_count = match db.execute_scalar(&count_sql, &[]).await {
        Ok(value) => value.and_then(|v| v.as_i64()).unwrap_or(0),
        Err(e) => {
            log::warn!("Table {table} is not accessible: {e}");
            return TableProbe {
                table: table.to_string(),
                accessible: false,
                row_count: 0,
                columns: Vec::new(),
                error: Some(e.to_string()),
            };
        }
    };

    let columns = db
        .execute(
            "SELECT COLUMN_NAME, DATA_TYPE, CHARACTER_MAXIMUM_LENGTH, IS_NULLABLE \
             FROM INFORMATION_SCHEMA.COLUMNS \
             WHERE TABLE_NAME = @P1 \
             ORDER BY ORDINAL_POSITION",
            &[SqlParam::from(table)],
            Some(&format!("columns_{table}")),
            crate::db::DEFAULT_TTL,
        )
        .await;

    match columns {
        Ok(rows) => TableProbe {
            table: table.to_string(),
            accessible: true,
            row_count,
            columns: rows
                .iter()
                .map(|r| ColumnInfo {
                    name: r.text("COLUMN_NAME"),
                    data_type: r.text("DATA_TYPE"),
                    max_length: r.opt_int("CHARACTER_MAXIMUM_LENGTH"),
                    nullable: r.text("IS_NULLABLE") == "YES",
                })
                .collect(),
            error: None,
        },
        Err(e) => TableProbe {
            table: table.to_string(),
            accessible: true,
            row_count,
            columns: Vec::new(),
            error: Some(e.to_string()),
        },
    }
}

/// Probe every table in [`KNOWN_TABLES`].
pub async fn probe_all(db: &Database) -> Vec<TableProbe> {
    let mut probes = Vec::with_capacity(KNOWN_TABLES.len());
    for table in KNOWN_TABLES {
        probes.push(probe_table(db, table).await);
    }
    probes
}
