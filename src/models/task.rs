use chrono::NaiveDateTime;
use serde::Serialize;

use crate::db::{Database, DbError, Row, SqlParam, DEFAULT_TTL};
use crate::models::format;

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub status: String,
    pub priority: String,
    pub priority_color: &'static str,
    pub due_date: Option<NaiveDateTime>,
    pub start_date: Option<NaiveDateTime>,
    pub due_date_formatted: String,
    pub start_date_formatted: String,
    /// 0–100; SharePoint stores a fraction.
    pub percent_complete: i64,
    pub description: String,
    pub created: Option<NaiveDateTime>,
    pub assigned_to: String,
    pub assigned_to_email: String,
    pub created_by: String,
    pub is_overdue: bool,
}

impl Task {
    pub fn from_row(row: &Row, now: NaiveDateTime) -> Self {
        let status = row.text("Status");
        let priority = row.text("Priority");
        let due_date = row.datetime("DueDate");
        Task {
            id: row.int("Id"),
            title: row.text("Title"),
            is_overdue: status != "Completed" && due_date.is_some_and(|due| due < now),
            priority_color: format::priority_color(&priority),
            status,
            priority,
            due_date,
            start_date: row.datetime("StartDate"),
            due_date_formatted: format::format_date(row.get("DueDate")),
            start_date_formatted: format::format_date(row.get("StartDate")),
            percent_complete: (row.float("PercentComplete") * 100.0) as i64,
            description: format::clean_html(&row.text("Description")),
            created: row.datetime("Created"),
            assigned_to: row.text("AssignedTo"),
            assigned_to_email: row.text("AssignedToEmail"),
            created_by: row.text("CreatedBy"),
        }
    }
}

/// Priority rank first, then earliest due date (undated tasks lead, as in
/// SQL Server's ascending NULL ordering). Stable for equal keys.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| (format::priority_rank(&t.priority), t.due_date));
}

/// Items of the `Tasks` list, optionally narrowed by assignee display name
/// and/or status.
pub async fn find(
    db: &Database,
    assigned_to: Option<&str>,
    status: Option<&str>,
    now: NaiveDateTime,
) -> Result<Vec<Task>, DbError> {
    let cache_key = if assigned_to.is_some() || status.is_some() {
        // Debug quoting keeps absent and literal "None" filters apart.
        format!("tasks_a={assigned_to:?}_s={status:?}")
    } else {
        "tasks_all".to_string()
    };

    let rows = db
        .execute(
            "SELECT UD.tp_ID AS Id, \
                    UD.nvarchar1 AS Title, \
                    UD.nvarchar3 AS Status, \
                    UD.nvarchar4 AS Priority, \
                    UD.datetime1 AS DueDate, \
                    UD.datetime2 AS StartDate, \
                    UD.float1 AS PercentComplete, \
                    UD.ntext2 AS Description, \
                    UD.tp_Created AS Created, \
                    U.tp_Title AS AssignedTo, \
                    U.tp_Email AS AssignedToEmail, \
                    C.tp_Title AS CreatedBy \
             FROM AllUserData UD WITH (NOLOCK) \
             INNER JOIN AllLists L WITH (NOLOCK) ON UD.tp_ListId = L.tp_ID \
             LEFT JOIN UserInfo U WITH (NOLOCK) ON UD.int1 = U.tp_ID \
             LEFT JOIN UserInfo C WITH (NOLOCK) ON UD.tp_Author = C.tp_ID \
             WHERE L.tp_Title = 'Tasks' \
               AND UD.tp_DeleteTransactionId = 0x \
               AND UD.tp_IsCurrentVersion = 1 \
               AND (@P1 IS NULL OR U.tp_Title = @P1) \
               AND (@P2 IS NULL OR UD.nvarchar3 = @P2) \
             ORDER BY \
                CASE UD.nvarchar4 \
                    WHEN 'High' THEN 1 \
                    WHEN 'Normal' THEN 2 \
                    WHEN 'Low' THEN 3 \
                    ELSE 4 \
                END, \
                UD.datetime1 ASC",
            &[SqlParam::from(assigned_to), SqlParam::from(status)],
            Some(&cache_key),
            DEFAULT_TTL,
        )
        .await?;

    let mut tasks: Vec<Task> = rows.iter().map(|row| Task::from_row(row, now)).collect();
    sort_tasks(&mut tasks);
    log::info!("Fetched {} tasks", tasks.len());
    Ok(tasks)
}
