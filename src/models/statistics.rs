use std::time::Duration;

use serde::Serialize;

use crate::db::{Database, DbError, Row, DEFAULT_TTL};
use crate::models::format;

const CACHE_TTL: Duration = Duration::from_secs(60);

/// Number of lists shown in the per-list breakdown.
const BREAKDOWN_SIZE: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct ListItemCount {
    pub list_name: String,
    pub item_count: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteStatistics {
    pub total_lists: i64,
    pub total_documents: i64,
    pub active_users: i64,
    pub total_size_mb: f64,
    pub total_size_gb: f64,
    pub total_size_formatted: String,
    pub items_today: i64,
    pub items_this_week: i64,
    pub lists_breakdown: Vec<ListItemCount>,
}

impl SiteStatistics {
    pub fn from_rows(totals: Option<&Row>, breakdown: &[Row]) -> Self {
        let empty = Row::new();
        let totals = totals.unwrap_or(&empty);
        let total_size_mb = totals.float("TotalSizeMB");
        SiteStatistics {
            total_lists: totals.int("TotalLists"),
            total_documents: totals.int("TotalDocuments"),
            active_users: totals.int("ActiveUsers"),
            total_size_mb,
            total_size_gb: (total_size_mb / 1024.0 * 100.0).round() / 100.0,
            total_size_formatted: format::format_file_size(total_size_mb * 1_048_576.0),
            items_today: totals.int("ItemsToday"),
            items_this_week: totals.int("ItemsThisWeek"),
            lists_breakdown: breakdown
                .iter()
                .take(BREAKDOWN_SIZE)
                .map(|row| ListItemCount {
                    list_name: row.text("ListName"),
                    item_count: row.int("ItemCount"),
                })
                .collect(),
        }
    }
}

/// Site-wide counters plus the ten busiest lists.
pub async fn collect(db: &Database) -> Result<SiteStatistics, DbError> {
    let totals = db
        .execute(
            "SELECT \
                (SELECT COUNT(DISTINCT tp_ID) FROM AllLists WHERE tp_Hidden = 0) AS TotalLists, \
                (SELECT COUNT(*) FROM AllDocs WHERE Type = 0 AND DeleteTransactionId = 0x) AS TotalDocuments, \
                (SELECT COUNT(*) FROM UserInfo WHERE tp_IsActive = 1) AS ActiveUsers, \
                (SELECT CAST(SUM(CAST(Size AS BIGINT)) / 1048576.0 AS DECIMAL(18,2)) FROM AllDocs WHERE Type = 0) AS TotalSizeMB, \
                (SELECT COUNT(*) FROM AllUserData WHERE tp_Created >= CAST(GETDATE() AS DATE)) AS ItemsToday, \
                (SELECT COUNT(*) FROM AllUserData WHERE tp_Modified >= DATEADD(day, -7, GETDATE())) AS ItemsThisWeek",
            &[],
            Some("statistics"),
            CACHE_TTL,
        )
        .await?;

    let breakdown = db
        .execute(
            "SELECT L.tp_Title AS ListName, COUNT(UD.tp_ID) AS ItemCount \
             FROM AllLists L WITH (NOLOCK) \
             LEFT JOIN AllUserData UD WITH (NOLOCK) ON L.tp_ID = UD.tp_ListId \
             WHERE L.tp_Hidden = 0 \
               AND UD.tp_DeleteTransactionId = 0x \
             GROUP BY L.tp_Title \
             ORDER BY ItemCount DESC",
            &[],
            Some("lists_statistics"),
            DEFAULT_TTL,
        )
        .await?;

    log::info!("Fetched site statistics");
    Ok(SiteStatistics::from_rows(totals.first(), &breakdown))
}
