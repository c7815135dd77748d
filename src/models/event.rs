use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// A row of the `eventos` table. Timestamps are stored as UTC wall-clock
/// values without a zone designator.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Event {
    pub id: u64,
    pub title: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub color: String,
    pub location: String,
    pub description: String,
    pub notify: bool,
    pub notify_time: Option<i32>,
    #[sqlx(rename = "type")]
    pub kind: String,
}

/// Column values for an insert or a full-row update, with defaults applied
/// and timestamps already in the storage literal format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub start: String,
    pub end: String,
    pub color: String,
    pub location: String,
    pub description: String,
    pub notify: bool,
    pub notify_time: Option<i32>,
    pub kind: String,
}

/// Wire record returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventResponse {
    pub id: u64,
    pub title: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub color: String,
    pub location: String,
    pub description: String,
    pub notify: bool,
    pub notify_time: Option<i32>,
    #[serde(rename = "type")]
    pub kind: String,
}
