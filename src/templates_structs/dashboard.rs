use askama::Template;

use super::PageContext;
use crate::models::announcement::Announcement;
use crate::models::calendar::CalendarEvent;
use crate::models::document::Document;
use crate::models::statistics::SiteStatistics;
use crate::models::task::Task;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub announcements: Vec<Announcement>,
    pub documents: Vec<Document>,
    pub tasks: Vec<Task>,
    pub events: Vec<CalendarEvent>,
    pub statistics: SiteStatistics,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub ctx: PageContext,
    pub message: String,
}
