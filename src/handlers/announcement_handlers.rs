use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::db::Database;
use crate::errors::{render, AppError};
use crate::handlers::{now, redirect_home};
use crate::models::announcement;
use crate::models::pagination::Page;
use crate::templates_structs::{AnnouncementListTemplate, PageContext};

const FETCH_LIMIT: i64 = 50;
const PER_PAGE: usize = 10;

#[derive(Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

/// GET /announcements/
pub async fn list(
    db: web::Data<Database>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let announcements = match announcement::find_recent(&db, FETCH_LIMIT, now()).await {
        Ok(a) => a,
        Err(e) => {
            log::error!("Error loading announcements: {e}");
            return Ok(redirect_home(&session, "Error loading announcements"));
        }
    };

    let page_obj = Page::from_items(announcements, query.page.as_deref(), PER_PAGE);
    let ctx = PageContext::build(&session, &config, "/announcements/", "Announcements");
    render(AnnouncementListTemplate { ctx, page_obj })
}
