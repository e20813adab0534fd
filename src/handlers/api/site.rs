use std::time::Duration;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::failure;
use crate::cache::ResponseCache;
use crate::db::Database;
use crate::models::{diagnostics, list_info, statistics, user};
use crate::templates_structs::{
    DiagnosticsResponse, HealthFailure, HealthResponse, ListResponse,
    StatisticsResponse,
};

const STATISTICS_KEY: &str = "api_statistics";
const STATISTICS_TTL: Duration = Duration::from_secs(60);

#[derive(Deserialize)]
pub struct UserQuery {
    active: Option<String>,
}

/// GET /api/statistics/
/// The serialized body is cached for a minute on top of the query cache.
pub async fn statistics(db: web::Data<Database>, responses: web::Data<ResponseCache>) -> HttpResponse {
    if let Some(body) = responses.get_value(STATISTICS_KEY) {
        return HttpResponse::Ok().json(body);
    }

    match statistics::collect(&db).await {
        Ok(data) => {
            let response = StatisticsResponse { success: true, data };
            match serde_json::to_value(&response) {
                Ok(body) => {
                    responses.set_value(STATISTICS_KEY, body.clone(), STATISTICS_TTL);
                    HttpResponse::Ok().json(body)
                }
                Err(e) => {
                    log::error!("Could not serialize statistics: {e}");
                    HttpResponse::Ok().json(response)
                }
            }
        }
        Err(e) => failure("Error loading statistics", e),
    }
}

/// GET /api/lists/
pub async fn lists(db: web::Data<Database>) -> HttpResponse {
    match list_info::find_all(&db).await {
        Ok(items) => HttpResponse::Ok().json(ListResponse::new(items)),
        Err(e) => failure("Error loading lists", e),
    }
}

/// GET /api/users/?active=true
pub async fn users(db: web::Data<Database>, query: web::Query<UserQuery>) -> HttpResponse {
    let active_only = !matches!(
        query.active.as_deref().map(|a| a.trim().to_ascii_lowercase()).as_deref(),
        Some("0" | "false" | "no")
    );
    match user::find_all(&db, active_only).await {
        Ok(items) => HttpResponse::Ok().json(ListResponse::new(items)),
        Err(e) => failure("Error loading users", e),
    }
}

/// GET /api/diagnostics/
pub async fn diagnostics(db: web::Data<Database>) -> HttpResponse {
    let tables = diagnostics::probe_all(&db).await;
    HttpResponse::Ok().json(DiagnosticsResponse { success: true, tables })
}

/// GET /api/test/
/// Connectivity probe with basic server information.
pub async fn test_connection(db: web::Data<Database>) -> HttpResponse {
    if !db.test_connection().await {
        return HttpResponse::InternalServerError().json(HealthFailure {
            success: false,
            message: "Cannot connect to the database".to_string(),
        });
    }
    match db.database_info().await {
        Ok(info) => HttpResponse::Ok().json(HealthResponse {
            success: true,
            message: "Connection successful".to_string(),
            info,
        }),
        Err(e) => failure("Error reading database info", e),
    }
}
