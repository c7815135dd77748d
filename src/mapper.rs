//! Conversions between wire records and `eventos` rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::input::{EventInput, NotifyTime};
use crate::models::{Event, EventResponse, NewEvent};
use crate::validation::ValidationError;

pub const DEFAULT_COLOR: &str = "#3788d8";
pub const DEFAULT_TYPE: &str = "Social";

/// Literal format the storage engine expects for DATETIME columns.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a wire timestamp into an instant.
///
/// RFC 3339 strings keep their offset. Timestamps without a zone designator,
/// and bare dates, are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Converts a wire timestamp to the storage literal, truncated to seconds.
pub fn to_storage_timestamp(raw: &str) -> Result<String, ValidationError> {
    parse_timestamp(raw)
        .map(|instant| instant.naive_utc().format(STORAGE_FORMAT).to_string())
        .ok_or(ValidationError::InvalidDate)
}

pub fn parse_storage_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, STORAGE_FORMAT).ok()
}

/// Formats a stored timestamp as full ISO 8601 with millisecond precision
/// and a UTC designator.
pub fn to_wire_timestamp(stored: Option<NaiveDateTime>) -> Option<String> {
    stored.map(|naive| {
        naive
            .and_utc()
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string()
    })
}

impl TryFrom<EventInput> for NewEvent {
    type Error = ValidationError;

    /// Applies column defaults and storage formatting. `notify_time` is only
    /// kept when `notify` is set.
    fn try_from(input: EventInput) -> Result<Self, Self::Error> {
        let start = to_storage_timestamp(input.start_value().unwrap_or_default())?;
        let end = to_storage_timestamp(input.end_value().unwrap_or_default())?;

        let notify_time = match (input.notify, input.notify_time) {
            (true, NotifyTime::Minutes(minutes)) => Some(
                i32::try_from(minutes).map_err(|_| ValidationError::InvalidNotifyTime)?,
            ),
            _ => None,
        };

        Ok(Self {
            title: input.title.unwrap_or_default(),
            start,
            end,
            color: non_empty_or(input.color, DEFAULT_COLOR),
            location: input.location.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
            notify: input.notify,
            notify_time,
            kind: non_empty_or(input.kind, DEFAULT_TYPE),
        })
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            start: to_wire_timestamp(event.start),
            end: to_wire_timestamp(event.end),
            color: event.color,
            location: event.location,
            description: event.description,
            notify: event.notify,
            notify_time: event.notify_time,
            kind: event.kind,
        }
    }
}
