use actix_session::Session;
use actix_web::{http::StatusCode, web, HttpResponse};

use crate::config::AppConfig;
use crate::db::{Database, DbError};
use crate::errors::{render, render_with_status, AppError};
use crate::handlers::now;
use crate::models::{announcement, calendar, document, statistics, task};
use crate::templates_structs::{DashboardTemplate, ErrorTemplate, PageContext};

const PAGE_TITLE: &str = "Portal Dashboard";

/// GET /
/// Landing page: latest announcements, documents, tasks, the coming week's
/// events and site statistics.
pub async fn index(
    db: web::Data<Database>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    if !db.test_connection().await {
        let ctx = PageContext::build(&session, &config, "/", PAGE_TITLE);
        let tmpl = ErrorTemplate {
            ctx,
            message: "Cannot connect to the SharePoint database".to_string(),
        };
        return render_with_status(tmpl, StatusCode::SERVICE_UNAVAILABLE);
    }

    let now = now();
    let loaded = async {
        let announcements = announcement::find_recent(&db, 5, now).await?;
        let documents = document::find_recent(&db, &config.site_url, 10, None).await?;
        let mut tasks = task::find(&db, None, None, now).await?;
        tasks.truncate(5);
        let events = calendar::find_in_window(&db, 7, 0, now).await?;
        let statistics = statistics::collect(&db).await?;
        Ok::<_, DbError>((announcements, documents, tasks, events, statistics))
    }
    .await;

    let ctx = PageContext::build(&session, &config, "/", PAGE_TITLE);
    match loaded {
        Ok((announcements, documents, tasks, events, statistics)) => render(DashboardTemplate {
            ctx,
            announcements,
            documents,
            tasks,
            events,
            statistics,
        }),
        Err(e) => {
            log::error!("Error loading dashboard: {e}");
            let tmpl = ErrorTemplate {
                ctx,
                message: "Error loading the dashboard".to_string(),
            };
            render_with_status(tmpl, StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
