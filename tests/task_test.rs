/// Task retrieval: filters, ordering and derived fields.

use std::sync::Arc;

use spdash::db::SqlParam;
use spdash::models::task;

mod common;
use common::{at, database, task_row, MockExecutor};

#[tokio::test]
async fn test_tasks_ordered_by_priority_then_due_date() {
    let mock = Arc::new(MockExecutor::new().respond(
        "'Tasks'",
        vec![
            task_row(1, "low", "Low", Some(at(2026, 3, 1, 0))),
            task_row(2, "normal-late", "Normal", Some(at(2026, 3, 20, 0))),
            task_row(3, "high", "High", Some(at(2026, 4, 1, 0))),
            task_row(4, "normal-early", "Normal", Some(at(2026, 3, 5, 0))),
            task_row(5, "unranked", "(2) Medium", None),
        ],
    ));
    let db = database(mock);

    let tasks = task::find(&db, None, None, at(2026, 3, 10, 0)).await.expect("tasks");
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();

    assert_eq!(titles, vec!["high", "normal-early", "normal-late", "low", "unranked"]);
}

#[tokio::test]
async fn test_overdue_and_percent_derived() {
    let mock = Arc::new(MockExecutor::new().respond(
        "'Tasks'",
        vec![
            task_row(1, "past due", "High", Some(at(2026, 3, 1, 0))),
            task_row(2, "future", "High", Some(at(2026, 5, 1, 0))),
        ],
    ));
    let db = database(mock);

    let tasks = task::find(&db, None, None, at(2026, 3, 10, 0)).await.expect("tasks");

    assert!(tasks[0].is_overdue);
    assert!(!tasks[1].is_overdue);
    assert_eq!(tasks[0].percent_complete, 50);
    assert_eq!(tasks[0].priority_color, "danger");
}

#[tokio::test]
async fn test_filters_are_bound_as_parameters() {
    let mock = Arc::new(MockExecutor::new());
    let db = database(mock.clone());

    task::find(&db, Some("Ali Karimi"), None, at(2026, 3, 10, 0)).await.expect("tasks");

    let (_, params) = &mock.calls()[0];
    assert_eq!(
        params,
        &vec![SqlParam::Text("Ali Karimi".to_string()), SqlParam::Null]
    );
}

#[tokio::test]
async fn test_literal_none_filter_does_not_share_cache_entry() {
    let mock = Arc::new(MockExecutor::new().respond(
        "'Tasks'",
        vec![task_row(1, "Prepare budget", "High", None)],
    ));
    let db = database(mock.clone());
    let now = at(2026, 3, 10, 0);

    task::find(&db, Some("None"), Some("Open"), now).await.expect("named None");
    task::find(&db, None, Some("Open"), now).await.expect("no assignee");
    task::find(&db, Some("a_b"), None, now).await.expect("underscore");
    task::find(&db, Some("a"), Some("b_None"), now).await.expect("split underscore");

    assert_eq!(mock.call_count(), 4);

    task::find(&db, None, Some("Open"), now).await.expect("repeat");
    assert_eq!(mock.call_count(), 4);
}
