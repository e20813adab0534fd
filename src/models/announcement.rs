use std::time::Duration;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::db::{Database, DbError, Row, SqlParam};
use crate::models::format;

/// Body text kept for list views; the full cleaned text is in `body_full`.
const BODY_PREVIEW_CHARS: usize = 500;

const CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Serialize)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub body_full: String,
    pub created: Option<NaiveDateTime>,
    pub modified: Option<NaiveDateTime>,
    pub author_name: String,
    pub author_email: String,
    pub list_name: String,
    pub created_formatted: String,
    pub created_relative: String,
}

impl Announcement {
    pub fn from_row(row: &Row, now: NaiveDateTime) -> Self {
        let body_full = format::clean_html(&row.text("Body"));
        let created = row.datetime("Created");
        Announcement {
            id: row.int("Id"),
            title: row.text("Title"),
            body: body_full.chars().take(BODY_PREVIEW_CHARS).collect(),
            body_full,
            created,
            modified: row.datetime("Modified"),
            author_name: row.text("AuthorName"),
            author_email: row.text("AuthorEmail"),
            list_name: row.text("ListName"),
            created_formatted: format::format_date(row.get("Created")),
            created_relative: format::relative_time(created, now),
        }
    }
}

/// Latest items of the `Announcements` list, newest first.
pub async fn find_recent(
    db: &Database,
    limit: i64,
    now: NaiveDateTime,
) -> Result<Vec<Announcement>, DbError> {
    let rows = db
        .execute(
            "SELECT TOP (@P1) \
                    UD.tp_ID AS Id, \
                    UD.nvarchar1 AS Title, \
                    UD.ntext2 AS Body, \
                    UD.tp_Created AS Created, \
                    UD.tp_Modified AS Modified, \
                    U.tp_Title AS AuthorName, \
                    U.tp_Email AS AuthorEmail, \
                    L.tp_Title AS ListName \
             FROM AllUserData UD WITH (NOLOCK) \
             INNER JOIN AllLists L WITH (NOLOCK) ON UD.tp_ListId = L.tp_ID \
             LEFT JOIN UserInfo U WITH (NOLOCK) ON UD.tp_Author = U.tp_ID \
             WHERE L.tp_Title = 'Announcements' \
               AND UD.tp_DeleteTransactionId = 0x \
               AND UD.tp_IsCurrentVersion = 1 \
               AND UD.tp_RowOrdinal = 0 \
             ORDER BY UD.tp_Created DESC",
            &[SqlParam::Int(limit)],
            Some(&format!("announcements_{limit}")),
            CACHE_TTL,
        )
        .await?;

    let announcements: Vec<Announcement> =
        rows.iter().map(|row| Announcement::from_row(row, now)).collect();
    log::info!("Fetched {} announcements", announcements.len());
    Ok(announcements)
}
