use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::db::Database;
use crate::errors::{render, AppError};
use crate::handlers::redirect_home;
use crate::models::document::{self, ALLOWED_EXTENSIONS};
use crate::models::pagination::Page;
use crate::templates_structs::{DocumentListTemplate, PageContext};

const FETCH_LIMIT: i64 = 100;
const PER_PAGE: usize = 20;

#[derive(Deserialize)]
pub struct DocumentQuery {
    ext: Option<String>,
    page: Option<String>,
}

/// GET /documents/
/// Recent documents, optionally restricted to one file extension.
pub async fn list(
    db: web::Data<Database>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<DocumentQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = match query.ext.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        None => None,
        Some(raw) => match document::validate_extension(raw) {
            Some(ext) => Some(ext),
            None => {
                log::warn!("Rejected document filter {raw:?}");
                return Ok(redirect_home(&session, "Unsupported file type filter"));
            }
        },
    };

    let extensions = filter.map(|ext| [ext]);
    let documents = match document::find_recent(
        &db,
        &config.site_url,
        FETCH_LIMIT,
        extensions.as_ref().map(|e| e.as_slice()),
    )
    .await
    {
        Ok(d) => d,
        Err(e) => {
            log::error!("Error loading documents: {e}");
            return Ok(redirect_home(&session, "Error loading documents"));
        }
    };

    let page_obj = Page::from_items(documents, query.page.as_deref(), PER_PAGE);
    let ctx = PageContext::build(&session, &config, "/documents/", "Documents");
    render(DocumentListTemplate {
        ctx,
        page_obj,
        current_filter: filter.unwrap_or_default().to_string(),
        extensions: ALLOWED_EXTENSIONS,
    })
}
