//! Connection manager for the SharePoint content database.
//!
//! Every query runs on its own short-lived connection opened by the
//! [`QueryExecutor`]; [`Database`] adds read-through caching, error logging
//! and the scalar/health helpers on top.

mod row;
mod sqlserver;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::cache::Cache;

pub use row::{Row, SqlParam, SqlValue};
pub use sqlserver::SqlServer;

/// Default cache lifetime for query results.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// How much of a failing query is written to the log.
const QUERY_LOG_EXCERPT: usize = 200;

#[derive(Debug)]
pub enum DbError {
    /// The server could not be reached or refused the login.
    Connect(String),
    /// The statement failed after a connection was established.
    Query(String),
    /// Connecting took longer than the configured timeout.
    Timeout(Duration),
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::Connect(e) => write!(f, "Connection error: {e}"),
            DbError::Query(e) => write!(f, "Query error: {e}"),
            DbError::Timeout(d) => write!(f, "Connection timed out after {}s", d.as_secs()),
        }
    }
}

impl std::error::Error for DbError {}

/// Runs one statement on a freshly opened connection and returns every row.
/// The connection must be closed before the call returns, on every path.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn fetch_all(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>, DbError>;
}

/// Handle shared by all request handlers.
#[derive(Clone)]
pub struct Database {
    executor: Arc<dyn QueryExecutor>,
    cache: Arc<dyn Cache>,
}

impl Database {
    pub fn new(executor: Arc<dyn QueryExecutor>, cache: Arc<dyn Cache>) -> Self {
        Database { executor, cache }
    }

    /// Execute `sql` and return its rows. With a `cache_key`, a cached result
    /// is returned without touching the database, and a non-empty fresh result
    /// is stored for `ttl`.
    pub async fn execute(
        &self,
        sql: &str,
        params: &[SqlParam],
        cache_key: Option<&str>,
        ttl: Duration,
    ) -> Result<Vec<Row>, DbError> {
        if let Some(rows) = cache_key.and_then(|key| self.cache.get(key)) {
            log::debug!("Cache hit for key: {}", cache_key.unwrap_or_default());
            return Ok(rows);
        }

        let rows = self.executor.fetch_all(sql, params).await.inspect_err(|e| {
            log::error!("Error executing query: {e}");
            log::error!("Query: {}...", excerpt(sql));
        })?;
        log::info!("Query executed successfully, returned {} rows", rows.len());

        if let Some(key) = cache_key.filter(|_| !rows.is_empty()) {
            self.cache.set(key, rows.clone(), ttl);
            log::debug!("Cached results for key: {key}");
        }

        Ok(rows)
    }

    /// First column of the first row, or `None` for an empty result.
    pub async fn execute_scalar(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Option<SqlValue>, DbError> {
        let rows = self.executor.fetch_all(sql, params).await.inspect_err(|e| {
            log::error!("Error executing scalar query: {e}");
            log::error!("Query: {}...", excerpt(sql));
        })?;
        Ok(rows.first().and_then(|r| r.first_value()).cloned())
    }

    /// Reachability probe. Never fails; errors are logged and reported as `false`.
    pub async fn test_connection(&self) -> bool {
        match self.executor.fetch_all("SELECT 1 AS Ok", &[]).await {
            Ok(rows) => {
                let ok = rows.first().and_then(|r| r.opt_int("Ok")) == Some(1);
                if ok {
                    log::info!("Database connection test successful");
                }
                ok
            }
            Err(e) => {
                log::error!("Database connection test failed: {e}");
                false
            }
        }
    }

    /// Server identification shown by the health endpoint.
    pub async fn database_info(&self) -> Result<Row, DbError> {
        let rows = self
            .execute(
                "SELECT DB_NAME() AS DatabaseName, \
                        @@VERSION AS ServerVersion, \
                        @@SERVERNAME AS ServerName, \
                        SUSER_NAME() AS CurrentUser, \
                        (SELECT COUNT(*) FROM sys.tables) AS TableCount",
                &[],
                None,
                DEFAULT_TTL,
            )
            .await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }
}

fn excerpt(sql: &str) -> String {
    sql.chars().take(QUERY_LOG_EXCERPT).collect()
}
