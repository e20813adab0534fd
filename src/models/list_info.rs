use std::time::Duration;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::db::{Database, DbError, Row};
use crate::models::format;

const CACHE_TTL: Duration = Duration::from_secs(600);

/// Metadata for one visible SharePoint list or library.
#[derive(Debug, Clone, Serialize)]
pub struct ListInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub item_count: i64,
    pub created: Option<NaiveDateTime>,
    pub modified: Option<NaiveDateTime>,
    pub created_formatted: String,
    pub template: i64,
    pub template_type: &'static str,
    pub icon: &'static str,
    pub base_type: i64,
    pub is_hidden: bool,
    pub web_url: String,
}

impl ListInfo {
    pub fn from_row(row: &Row) -> Self {
        let template = row.int("Template");
        ListInfo {
            id: row.text("Id"),
            title: row.text("Title"),
            description: row.text("Description"),
            item_count: row.int("ItemCount"),
            created: row.datetime("Created"),
            modified: row.datetime("Modified"),
            created_formatted: format::format_date(row.get("Created")),
            template,
            template_type: format::list_template_name(template),
            icon: format::list_icon(template),
            base_type: row.int("BaseType"),
            is_hidden: row.flag("IsHidden"),
            web_url: row.text("WebUrl"),
        }
    }
}

/// Non-hidden, non-empty lists, largest first.
pub async fn find_all(db: &Database) -> Result<Vec<ListInfo>, DbError> {
    let rows = db
        .execute(
            "SELECT L.tp_ID AS Id, \
                    L.tp_Title AS Title, \
                    L.tp_Description AS Description, \
                    L.tp_ItemCount AS ItemCount, \
                    L.tp_Created AS Created, \
                    L.tp_Modified AS Modified, \
                    L.tp_ServerTemplate AS Template, \
                    L.tp_BaseType AS BaseType, \
                    L.tp_Hidden AS IsHidden, \
                    W.FullUrl AS WebUrl \
             FROM AllLists L WITH (NOLOCK) \
             INNER JOIN Webs W WITH (NOLOCK) ON L.tp_WebId = W.Id \
             WHERE L.tp_Hidden = 0 \
               AND L.tp_ItemCount > 0 \
             ORDER BY L.tp_ItemCount DESC",
            &[],
            Some("lists_info"),
            CACHE_TTL,
        )
        .await?;

    let lists: Vec<ListInfo> = rows.iter().map(ListInfo::from_row).collect();
    log::info!("Fetched {} lists", lists.len());
    Ok(lists)
}
