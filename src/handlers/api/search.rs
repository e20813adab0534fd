use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::{failure, parse_positive, reject, MAX_LIMIT};
use crate::db::Database;
use crate::errors::AppError;
use crate::models::search::{self, SearchScope};
use crate::templates_structs::SearchResponse;

#[derive(Deserialize)]
pub struct ApiSearchQuery {
    q: Option<String>,
    #[serde(rename = "type")]
    scope: Option<String>,
    limit: Option<String>,
}

/// GET /api/search/?q=&type=all&limit=50
pub async fn search(db: web::Data<Database>, query: web::Query<ApiSearchQuery>) -> HttpResponse {
    let keyword = query.q.as_deref().unwrap_or("").trim();
    if !search::is_searchable(keyword) {
        return reject(AppError::Validation(format!(
            "Search keyword must be at least {} characters",
            search::MIN_KEYWORD_CHARS
        )));
    }
    let Some(scope) = SearchScope::parse(query.scope.as_deref()) else {
        return reject(AppError::Validation(
            "type must be one of: all, items, documents".to_string(),
        ));
    };
    let limit = match parse_positive("limit", query.limit.as_deref(), search::DEFAULT_LIMIT, MAX_LIMIT) {
        Ok(l) => l,
        Err(e) => return reject(e),
    };

    match search::search(&db, keyword, scope, limit).await {
        Ok(results) => HttpResponse::Ok().json(SearchResponse {
            success: true,
            query: keyword.to_string(),
            count: results.len(),
            results,
        }),
        Err(e) => failure("Search error", e),
    }
}
