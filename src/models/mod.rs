pub mod announcement;
pub mod calendar;
pub mod diagnostics;
pub mod document;
pub mod format;
pub mod list_info;
pub mod pagination;
pub mod search;
pub mod statistics;
pub mod task;
pub mod user;
