pub mod content;
pub mod search;
pub mod site;

use actix_web::{web, HttpResponse, ResponseError};

use crate::db::DbError;
use crate::errors::AppError;
use crate::templates_structs::ApiErrorResponse;

/// Upper bound for any client-supplied `limit`.
pub const MAX_LIMIT: i64 = 500;

/// Configure the JSON endpoints under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/announcements/", web::get().to(content::announcements))
        .route("/documents/", web::get().to(content::documents))
        .route("/tasks/", web::get().to(content::tasks))
        .route("/calendar/", web::get().to(content::calendar))
        .route("/search/", web::get().to(search::search))
        .route("/statistics/", web::get().to(site::statistics))
        .route("/lists/", web::get().to(site::lists))
        .route("/users/", web::get().to(site::users))
        .route("/diagnostics/", web::get().to(site::diagnostics))
        .route("/test/", web::get().to(site::test_connection));
}

/// Parse a positive integer query parameter, falling back to `default` when
/// it is absent and capping it at `max`.
pub(crate) fn parse_positive(
    name: &str,
    raw: Option<&str>,
    default: i64,
    max: i64,
) -> Result<i64, AppError> {
    let raw = match raw.map(str::trim).filter(|r| !r.is_empty()) {
        Some(r) => r,
        None => return Ok(default),
    };
    match raw.parse::<i64>() {
        Ok(n) if n >= 1 => Ok(n.min(max)),
        _ => Err(AppError::Validation(format!("{name} must be a positive integer"))),
    }
}

/// Report a rejected request in the JSON error envelope.
pub(crate) fn reject(err: AppError) -> HttpResponse {
    log::warn!("Rejected API request: {err}");
    HttpResponse::build(err.status_code()).json(ApiErrorResponse::new(err.to_string()))
}

/// Log a failed query and report `context` in the JSON error envelope.
/// Driver text stays in the log.
pub(crate) fn failure(context: &str, e: DbError) -> HttpResponse {
    log::error!("{context}: {e}");
    HttpResponse::InternalServerError().json(ApiErrorResponse::new(context))
}
