use serde::Serialize;

use crate::db::Row;
use crate::models::calendar::CalendarEvent;
use crate::models::diagnostics::TableProbe;
use crate::models::search::SearchResult;
use crate::models::statistics::SiteStatistics;

/// `{success, data, count}` envelope for list endpoints.
#[derive(Serialize, Debug)]
pub struct ListResponse<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub count: usize,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        ListResponse { success: true, count: data.len(), data }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct StatisticsResponse {
    pub success: bool,
    pub data: SiteStatistics,
}

#[derive(Serialize, Debug)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub results: Vec<SearchResult>,
    pub count: usize,
}

#[derive(Serialize, Debug)]
pub struct CalendarResponse {
    pub success: bool,
    pub events: Vec<CalendarEvent>,
    pub count: usize,
}

#[derive(Serialize, Debug)]
pub struct DiagnosticsResponse {
    pub success: bool,
    pub tables: Vec<TableProbe>,
}

/// Connection probe succeeded.
#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub info: Row,
}

/// Connection probe failed.
#[derive(Serialize, Debug)]
pub struct HealthFailure {
    pub success: bool,
    pub message: String,
}

/// API error response.
#[derive(Serialize, Debug)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ApiErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ApiErrorResponse { success: false, error: error.into() }
    }
}
