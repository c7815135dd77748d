use std::fmt;

use thiserror::Error;

use crate::mapper::parse_timestamp;
use crate::models::input::{EventInput, NotifyTime};

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const LOCATION_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Start,
    End,
    Location,
    Description,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Start => "start",
            Field::End => "end",
            Field::Location => "location",
            Field::Description => "description",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Start => "Start",
            Field::End => "End",
            Field::Location => "Location",
            Field::Description => "Description",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing or invalid required field: {0}")]
    MissingField(Field),

    #[error("{} too long (maximum {max} characters).", .field.label())]
    TooLong { field: Field, max: usize },

    #[error("Invalid dates.")]
    InvalidDate,

    #[error("End date must be after start date.")]
    InvalidOrdering,

    #[error("Invalid notification time (must be a positive number).")]
    InvalidNotifyTime,
}

/// Checks an inbound event and reports the first rule it breaks.
///
/// Rules run in a fixed order: required fields, length limits, timestamp
/// parsing, interval ordering, then the notification lead time. `start` and
/// `end` are required as sent; the split date/time pair, when present, is
/// the value that gets parsed and ordered.
pub fn validate_event(input: &EventInput) -> Result<(), ValidationError> {
    let required = [
        (Field::Title, &input.title),
        (Field::Start, &input.start),
        (Field::End, &input.end),
        (Field::Location, &input.location),
        (Field::Description, &input.description),
    ];
    for (field, value) in required {
        if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
            return Err(ValidationError::MissingField(field));
        }
    }

    let limits = [
        (Field::Title, &input.title, TITLE_MAX_CHARS),
        (Field::Description, &input.description, DESCRIPTION_MAX_CHARS),
        (Field::Location, &input.location, LOCATION_MAX_CHARS),
    ];
    for (field, value, max) in limits {
        if value.as_deref().map_or(0, |v| v.chars().count()) > max {
            return Err(ValidationError::TooLong { field, max });
        }
    }

    let start = input.start_value().and_then(parse_timestamp);
    let end = input.end_value().and_then(parse_timestamp);
    let (Some(start), Some(end)) = (start, end) else {
        return Err(ValidationError::InvalidDate);
    };
    if end <= start {
        return Err(ValidationError::InvalidOrdering);
    }

    if input.notify {
        match input.notify_time {
            NotifyTime::Minutes(minutes) if minutes >= 1 => {}
            _ => return Err(ValidationError::InvalidNotifyTime),
        }
    }

    Ok(())
}
