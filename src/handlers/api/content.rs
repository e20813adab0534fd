use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::{failure, parse_positive, reject, MAX_LIMIT};
use crate::config::AppConfig;
use crate::db::Database;
use crate::handlers::now;
use crate::models::{announcement, calendar, document, task};
use crate::templates_structs::{CalendarResponse, ListResponse};

/// Longest calendar window, in days, a client may request.
const MAX_DAYS: i64 = 366;

#[derive(Deserialize)]
pub struct LimitQuery {
    limit: Option<String>,
}

#[derive(Deserialize)]
pub struct TaskQuery {
    assigned_to: Option<String>,
    status: Option<String>,
}

#[derive(Deserialize)]
pub struct CalendarQuery {
    days: Option<String>,
}

/// GET /api/announcements/?limit=10
pub async fn announcements(db: web::Data<Database>, query: web::Query<LimitQuery>) -> HttpResponse {
    let limit = match parse_positive("limit", query.limit.as_deref(), 10, MAX_LIMIT) {
        Ok(l) => l,
        Err(e) => return reject(e),
    };
    match announcement::find_recent(&db, limit, now()).await {
        Ok(items) => HttpResponse::Ok().json(ListResponse::new(items)),
        Err(e) => failure("Error loading announcements", e),
    }
}

/// GET /api/documents/?limit=20
pub async fn documents(
    db: web::Data<Database>,
    config: web::Data<AppConfig>,
    query: web::Query<LimitQuery>,
) -> HttpResponse {
    let limit = match parse_positive("limit", query.limit.as_deref(), 20, MAX_LIMIT) {
        Ok(l) => l,
        Err(e) => return reject(e),
    };
    match document::find_recent(&db, &config.site_url, limit, None).await {
        Ok(items) => HttpResponse::Ok().json(ListResponse::new(items)),
        Err(e) => failure("Error loading documents", e),
    }
}

/// GET /api/tasks/?assigned_to=&status=
pub async fn tasks(db: web::Data<Database>, query: web::Query<TaskQuery>) -> HttpResponse {
    let assigned_to = query.assigned_to.as_deref().filter(|s| !s.is_empty());
    let status = query.status.as_deref().filter(|s| !s.is_empty());
    match task::find(&db, assigned_to, status, now()).await {
        Ok(items) => HttpResponse::Ok().json(ListResponse::new(items)),
        Err(e) => failure("Error loading tasks", e),
    }
}

/// GET /api/calendar/?days=30
pub async fn calendar(db: web::Data<Database>, query: web::Query<CalendarQuery>) -> HttpResponse {
    let days = match parse_positive("days", query.days.as_deref(), 30, MAX_DAYS) {
        Ok(d) => d,
        Err(e) => return reject(e),
    };
    match calendar::find_in_window(&db, days, 0, now()).await {
        Ok(events) => HttpResponse::Ok().json(CalendarResponse {
            success: true,
            count: events.len(),
            events,
        }),
        Err(e) => failure("Error loading calendar events", e),
    }
}
