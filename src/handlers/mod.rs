pub mod announcement_handlers;
pub mod api;
pub mod dashboard;
pub mod document_handlers;
pub mod search_handlers;

use actix_session::Session;
use actix_web::{web, HttpResponse};
use chrono::{Local, NaiveDateTime};

use crate::session::set_flash;

/// Register every page and API route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(dashboard::index))
        .route("/announcements/", web::get().to(announcement_handlers::list))
        .route("/documents/", web::get().to(document_handlers::list))
        .route("/search/", web::get().to(search_handlers::search))
        .service(web::scope("/api").configure(api::configure));
}

/// Wall-clock time used for relative dates, overdue flags and event status.
pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Send the user back to the dashboard with a flash message.
pub(crate) fn redirect_home(session: &Session, message: &str) -> HttpResponse {
    set_flash(session, message);
    HttpResponse::SeeOther()
        .insert_header(("Location", "/"))
        .finish()
}
