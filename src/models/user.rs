use std::time::Duration;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::db::{Database, DbError, Row};
use crate::models::format;

const CACHE_TTL: Duration = Duration::from_secs(1800);

// The active-only restriction selects between two fixed statements rather
// than splicing a clause into one.
const ACTIVE_USERS_SQL: &str = "\
    SELECT tp_ID AS Id, tp_Title AS FullName, tp_Email AS Email, tp_Login AS LoginName, \
           tp_Created AS CreatedDate, tp_IsActive AS IsActive, tp_Deleted AS IsDeleted, \
           tp_SiteAdmin AS IsSiteAdmin \
    FROM UserInfo WITH (NOLOCK) \
    WHERE tp_Deleted = 0 AND tp_Email IS NOT NULL AND tp_Email != '' \
      AND tp_IsActive = 1 \
    ORDER BY tp_Title";

const ALL_USERS_SQL: &str = "\
    SELECT tp_ID AS Id, tp_Title AS FullName, tp_Email AS Email, tp_Login AS LoginName, \
           tp_Created AS CreatedDate, tp_IsActive AS IsActive, tp_Deleted AS IsDeleted, \
           tp_SiteAdmin AS IsSiteAdmin \
    FROM UserInfo WITH (NOLOCK) \
    WHERE tp_Deleted = 0 AND tp_Email IS NOT NULL AND tp_Email != '' \
    ORDER BY tp_Title";

#[derive(Debug, Clone, Serialize)]
pub struct SiteUser {
    pub id: i64,
    pub full_name: String,
    pub initials: String,
    pub email: String,
    pub login_name: String,
    pub domain: String,
    pub created: Option<NaiveDateTime>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub is_site_admin: bool,
}

impl SiteUser {
    pub fn from_row(row: &Row) -> Self {
        let full_name = row.text("FullName");
        let login_name = row.text("LoginName");
        SiteUser {
            id: row.int("Id"),
            initials: format::initials(&full_name),
            domain: format::login_domain(&login_name),
            full_name,
            email: row.text("Email"),
            login_name,
            created: row.datetime("CreatedDate"),
            is_active: row.flag("IsActive"),
            is_deleted: row.flag("IsDeleted"),
            is_site_admin: row.flag("IsSiteAdmin"),
        }
    }
}

/// Site users with an e-mail address, by display name.
pub async fn find_all(db: &Database, active_only: bool) -> Result<Vec<SiteUser>, DbError> {
    let (sql, cache_key) = if active_only {
        (ACTIVE_USERS_SQL, "users_active")
    } else {
        (ALL_USERS_SQL, "users_all")
    };
    let rows = db.execute(sql, &[], Some(cache_key), CACHE_TTL).await?;

    let users: Vec<SiteUser> = rows.iter().map(SiteUser::from_row).collect();
    log::info!("Fetched {} users", users.len());
    Ok(users)
}
