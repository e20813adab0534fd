use chrono::NaiveDateTime;
use serde::Serialize;

use crate::db::{Database, DbError, Row, SqlParam, DEFAULT_TTL};
use crate::models::format;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Past,
}

impl EventStatus {
    /// Position of the event relative to `now`. Events without a start time
    /// have no status.
    pub fn at(
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Option<Self> {
        let start = start?;
        Some(if start > now {
            EventStatus::Upcoming
        } else if end.is_some_and(|end| end < now) {
            EventStatus::Past
        } else {
            EventStatus::Ongoing
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Past => "past",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarEvent {
    pub id: i64,
    pub title: String,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub start_time_formatted: String,
    pub end_time_formatted: String,
    pub location: String,
    pub description: String,
    pub all_day: bool,
    pub category: String,
    pub organizer: String,
    pub created: Option<NaiveDateTime>,
    pub duration: String,
    pub status: Option<EventStatus>,
}

impl CalendarEvent {
    pub fn from_row(row: &Row, now: NaiveDateTime) -> Self {
        let start_time = row.datetime("StartTime");
        let end_time = row.datetime("EndTime");
        CalendarEvent {
            id: row.int("Id"),
            title: row.text("Title"),
            start_time,
            end_time,
            start_time_formatted: format::format_datetime(row.get("StartTime")),
            end_time_formatted: format::format_datetime(row.get("EndTime")),
            location: row.text("Location"),
            description: format::clean_html(&row.text("Description")),
            all_day: row.flag("AllDayEvent"),
            category: row.text("Category"),
            organizer: row.text("Organizer"),
            created: row.datetime("Created"),
            duration: format::event_duration(start_time, end_time),
            status: EventStatus::at(start_time, end_time, now),
        }
    }

    pub fn status_label(&self) -> &'static str {
        self.status.map_or("", |s| s.as_str())
    }
}

/// Events starting within `[now - days_behind, now + days_ahead]`, earliest
/// first. SharePoint calendars may be named in English or Persian.
pub async fn find_in_window(
    db: &Database,
    days_ahead: i64,
    days_behind: i64,
    now: NaiveDateTime,
) -> Result<Vec<CalendarEvent>, DbError> {
    let behind = day_offset(days_behind)?;
    let ahead = day_offset(days_ahead)?;
    let rows = db
        .execute(
            "SELECT UD.tp_ID AS Id, \
                    UD.nvarchar1 AS Title, \
                    UD.datetime1 AS StartTime, \
                    UD.datetime2 AS EndTime, \
                    UD.nvarchar3 AS Location, \
                    UD.ntext2 AS Description, \
                    UD.bit1 AS AllDayEvent, \
                    UD.nvarchar5 AS Category, \
                    UD.tp_Created AS Created, \
                    U.tp_Title AS Organizer \
             FROM AllUserData UD WITH (NOLOCK) \
             INNER JOIN AllLists L WITH (NOLOCK) ON UD.tp_ListId = L.tp_ID \
             LEFT JOIN UserInfo U WITH (NOLOCK) ON UD.tp_Author = U.tp_ID \
             WHERE L.tp_Title IN (N'Calendar', N'Events', N'تقویم') \
               AND UD.tp_DeleteTransactionId = 0x \
               AND UD.datetime1 >= DATEADD(day, -@P1, GETDATE()) \
               AND UD.datetime1 <= DATEADD(day, @P2, GETDATE()) \
             ORDER BY UD.datetime1 ASC",
            &[SqlParam::Int32(behind), SqlParam::Int32(ahead)],
            Some(&format!("events_{days_ahead}_{days_behind}")),
            DEFAULT_TTL,
        )
        .await?;

    let events: Vec<CalendarEvent> = rows.iter().map(|row| CalendarEvent::from_row(row, now)).collect();
    log::info!("Fetched {} calendar events", events.len());
    Ok(events)
}

/// `DATEADD` takes its number argument as `int`.
fn day_offset(days: i64) -> Result<i32, DbError> {
    i32::try_from(days).map_err(|_| DbError::Query(format!("Day offset out of range: {days}")))
}
