//! Shared test infrastructure.
//!
//! Tests never reach a real SQL Server. `MockExecutor` stands in for the TDS
//! driver: it records every statement it is asked to run and answers with
//! canned rows chosen by a substring of the SQL text.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{
    App,
    body::MessageBody,
    cookie::Key,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web,
};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use spdash::cache::{MemoryCache, ResponseCache};
use spdash::config::AppConfig;
use spdash::db::{Database, DbError, QueryExecutor, Row, SqlParam, SqlValue};
use spdash::handlers;

// ============================================================================
// MOCK EXECUTOR
// ============================================================================

#[derive(Default)]
pub struct MockExecutor {
    responses: Vec<(&'static str, Vec<Row>)>,
    calls: Mutex<Vec<(String, Vec<SqlParam>)>>,
    unreachable: bool,
    failing: bool,
}

impl MockExecutor {
    /// Answers `SELECT 1` and returns no rows for anything else.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer statements containing `marker` with `rows`. The first matching
    /// marker wins.
    pub fn respond(mut self, marker: &'static str, rows: Vec<Row>) -> Self {
        self.responses.push((marker, rows));
        self
    }

    /// Every statement, including the connectivity probe, fails to connect.
    pub fn unreachable() -> Self {
        MockExecutor { unreachable: true, ..Self::default() }
    }

    /// The connectivity probe succeeds but every other statement fails.
    pub fn failing() -> Self {
        MockExecutor { failing: true, ..Self::default() }
    }

    pub fn calls(&self) -> Vec<(String, Vec<SqlParam>)> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    /// Statements run, excluding the `SELECT 1` probe.
    pub fn query_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|(sql, _)| sql != "SELECT 1 AS Ok")
            .count()
    }
}

#[async_trait]
impl QueryExecutor for MockExecutor {
    async fn fetch_all(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>, DbError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((sql.to_string(), params.to_vec()));

        if self.unreachable {
            return Err(DbError::Connect("server not reachable".to_string()));
        }
        if sql == "SELECT 1 AS Ok" {
            return Ok(vec![Row::new().with("Ok", SqlValue::Int(1))]);
        }
        if self.failing {
            return Err(DbError::Query("Invalid object name 'AllUserData'".to_string()));
        }
        Ok(self
            .responses
            .iter()
            .find(|(marker, _)| sql.contains(marker))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }
}

// ============================================================================
// SETUP
// ============================================================================

pub const SITE_URL: &str = "http://sharepoint.test";

pub fn database(executor: Arc<MockExecutor>) -> Database {
    Database::new(executor, Arc::new(MemoryCache::new()))
}

pub fn test_config() -> AppConfig {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("SHAREPOINT_DB_SERVER", "db.test"),
        ("SHAREPOINT_DB_DATABASE", "WSS_Content"),
        ("SHAREPOINT_DB_USERNAME", "reader"),
        ("SHAREPOINT_DB_PASSWORD", "secret"),
        ("SHAREPOINT_SITE_URL", SITE_URL),
    ]);
    AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).expect("test config")
}

/// Application with every route registered, backed by `executor`.
pub fn app(
    executor: Arc<MockExecutor>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(
            SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&[7u8; 64]))
                .cookie_secure(false)
                .build(),
        )
        .app_data(web::Data::new(database(executor)))
        .app_data(web::Data::new(test_config()))
        .app_data(web::Data::new(ResponseCache::new()))
        .configure(handlers::configure)
}

// ============================================================================
// ROW FIXTURES
// ============================================================================

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, 0, 0))
        .expect("valid timestamp")
}

pub fn text(value: &str) -> SqlValue {
    SqlValue::Text(value.to_string())
}

pub fn announcement_row(id: i64, title: &str, created: NaiveDateTime) -> Row {
    Row::new()
        .with("Id", SqlValue::Int(id))
        .with("Title", text(title))
        .with("Body", text("<p>Body of the announcement</p>"))
        .with("Created", SqlValue::DateTime(created))
        .with("Modified", SqlValue::DateTime(created))
        .with("AuthorName", text("Sara Ahmadi"))
        .with("AuthorEmail", text("sara@example.com"))
        .with("ListName", text("Announcements"))
}

pub fn task_row(id: i64, title: &str, priority: &str, due: Option<NaiveDateTime>) -> Row {
    Row::new()
        .with("Id", SqlValue::Int(id))
        .with("Title", text(title))
        .with("Status", text("In Progress"))
        .with("Priority", text(priority))
        .with("DueDate", due.map_or(SqlValue::Null, SqlValue::DateTime))
        .with("PercentComplete", SqlValue::Float(0.5))
        .with("AssignedTo", text("Ali Karimi"))
}

pub fn document_row(id: &str, file_name: &str, extension: &str, size: i64) -> Row {
    Row::new()
        .with("Id", text(id))
        .with("FileName", text(file_name))
        .with("FolderPath", text("sites/hr/Shared Documents"))
        .with("Extension", text(extension))
        .with("SizeBytes", SqlValue::Int(size))
        .with("Modified", SqlValue::DateTime(at(2026, 3, 1, 9)))
        .with("CheckoutUserId", SqlValue::Null)
        .with("AuthorName", text("Ali Karimi"))
}

pub fn statistics_row() -> Row {
    Row::new()
        .with("TotalLists", SqlValue::Int(12))
        .with("TotalDocuments", SqlValue::Int(340))
        .with("ActiveUsers", SqlValue::Int(25))
        .with("TotalSizeMB", SqlValue::Float(2048.0))
        .with("ItemsToday", SqlValue::Int(3))
        .with("ItemsThisWeek", SqlValue::Int(17))
}
