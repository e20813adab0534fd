use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::db::Database;
use crate::errors::{render, AppError};
use crate::handlers::redirect_home;
use crate::models::search::{self, SearchScope};
use crate::templates_structs::{PageContext, SearchTemplate};

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub scope: Option<String>,
}

/// GET /search/
pub async fn search(
    db: web::Data<Database>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let keyword = query.q.as_deref().unwrap_or("").trim().to_string();
    if !search::is_searchable(&keyword) {
        return Ok(redirect_home(
            &session,
            &format!("Please enter at least {} characters", search::MIN_KEYWORD_CHARS),
        ));
    }
    let Some(scope) = SearchScope::parse(query.scope.as_deref()) else {
        return Ok(redirect_home(&session, "Unknown search type"));
    };

    let results = match search::search(&db, &keyword, scope, search::DEFAULT_LIMIT).await {
        Ok(r) => r,
        Err(e) => {
            log::error!("Search error: {e}");
            return Ok(redirect_home(&session, "Search failed"));
        }
    };

    let ctx = PageContext::build(
        &session,
        &config,
        "/search/",
        &format!("Search results: {keyword}"),
    );
    render(SearchTemplate {
        ctx,
        result_count: results.len(),
        query: keyword,
        scope: scope.as_str().to_string(),
        results,
    })
}
