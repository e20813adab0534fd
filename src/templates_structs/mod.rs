// Template context structures for Askama templates, organized by page.

use actix_session::Session;
use chrono::Local;

use crate::config::AppConfig;
use crate::session::take_flash;

/// Common context shared by all pages.
/// Templates access these as `ctx.app_name`, `ctx.flash`, etc.
pub struct PageContext {
    pub app_name: String,
    pub page_title: String,
    pub flash: Option<String>,
    pub current_path: String,
    pub current_time: String,
}

impl PageContext {
    pub fn build(session: &Session, config: &AppConfig, current_path: &str, page_title: &str) -> Self {
        Self {
            app_name: config.app_name.clone(),
            page_title: page_title.to_string(),
            flash: take_flash(session),
            current_path: current_path.to_string(),
            current_time: Local::now().format("%Y/%m/%d %H:%M").to_string(),
        }
    }

    /// Whether `path` is the active navigation entry.
    pub fn is_active(&self, path: &str) -> bool {
        if path == "/" {
            self.current_path == "/"
        } else {
            self.current_path.starts_with(path)
        }
    }
}

mod api;
mod dashboard;
mod listing;

pub use self::api::{
    ApiErrorResponse, CalendarResponse, DiagnosticsResponse, HealthFailure, HealthResponse,
    ListResponse, SearchResponse, StatisticsResponse,
};
pub use self::dashboard::{DashboardTemplate, ErrorTemplate};
pub use self::listing::{AnnouncementListTemplate, DocumentListTemplate, SearchTemplate};
