use serde_json::{Map, Value};

/// Classified notification lead time as it arrived on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyTime {
    Absent,
    NotANumber,
    Minutes(i64),
}

/// An inbound event body after every field has been classified once.
///
/// Text fields are `None` when the caller omitted them or sent a value that
/// has no textual form (`null`, `false`, `0`, arrays, objects).
///
/// `start`/`end` hold the combined wire fields as sent. `start_split`/
/// `end_split` hold the `<date>T<time>` join of the split fields when both
/// halves are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventInput {
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub start_split: Option<String>,
    pub end_split: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub notify: bool,
    pub notify_time: NotifyTime,
    pub kind: Option<String>,
}

impl EventInput {
    pub fn from_value(body: &Value) -> Self {
        let empty = Map::new();
        let fields = body.as_object().unwrap_or(&empty);
        let text = |key: &str| fields.get(key).and_then(text_of);

        Self {
            title: text("title"),
            start: text("start"),
            end: text("end"),
            start_split: combine_date_time(text("startDate"), text("startTime")),
            end_split: combine_date_time(text("endDate"), text("endTime")),
            color: text("color"),
            location: text("location"),
            description: text("description"),
            notify: fields.get("notify").is_some_and(truthy),
            notify_time: fields
                .get("notifyTime")
                .filter(|v| !v.is_null())
                .or_else(|| fields.get("notify_time"))
                .map_or(NotifyTime::Absent, notify_time_of),
            kind: text("type"),
        }
    }

    /// Start timestamp to persist: the split pair wins over `start`.
    pub fn start_value(&self) -> Option<&str> {
        self.start_split.as_deref().or(self.start.as_deref())
    }

    pub fn end_value(&self) -> Option<&str> {
        self.end_split.as_deref().or(self.end.as_deref())
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn combine_date_time(date: Option<String>, time: Option<String>) -> Option<String> {
    match (date, time) {
        (Some(date), Some(time)) if !date.is_empty() && !time.is_empty() => {
            Some(format!("{date}T{time}"))
        }
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "on" | "yes"
        ),
        _ => false,
    }
}

fn notify_time_of(value: &Value) -> NotifyTime {
    match value {
        Value::Null => NotifyTime::Absent,
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .map_or(NotifyTime::NotANumber, NotifyTime::Minutes),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_or(NotifyTime::NotANumber, NotifyTime::Minutes),
        _ => NotifyTime::NotANumber,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_date_and_time_are_combined() {
        let input = EventInput::from_value(&json!({
            "startDate": "2024-01-01",
            "startTime": "09:00",
            "endDate": "2024-01-01",
            "endTime": "09:30",
            "start": "ignored"
        }));

        assert_eq!(input.start_value(), Some("2024-01-01T09:00"));
        assert_eq!(input.end_value(), Some("2024-01-01T09:30"));
        assert_eq!(input.start.as_deref(), Some("ignored"));
        assert_eq!(input.end, None);
    }

    #[test]
    fn test_partial_split_falls_back_to_combined_field() {
        let input = EventInput::from_value(&json!({
            "startDate": "2024-01-01",
            "start": "2024-01-01T09:00:00Z"
        }));

        assert_eq!(input.start_split, None);
        assert_eq!(input.start_value(), Some("2024-01-01T09:00:00Z"));
        assert_eq!(input.end_value(), None);
    }

    #[test]
    fn test_text_classification() {
        let input = EventInput::from_value(&json!({
            "title": 42,
            "color": 0,
            "location": null,
            "description": false,
            "type": ["Work"]
        }));

        assert_eq!(input.title.as_deref(), Some("42"));
        assert_eq!(input.color, None);
        assert_eq!(input.location, None);
        assert_eq!(input.description, None);
        assert_eq!(input.kind, None);
    }

    #[test]
    fn test_notify_flag_classification() {
        let notify = |v: Value| EventInput::from_value(&json!({ "notify": v })).notify;

        assert!(notify(json!(true)));
        assert!(notify(json!(1)));
        assert!(notify(json!("yes")));
        assert!(!notify(json!(false)));
        assert!(!notify(json!("false")));
        assert!(!notify(json!(0)));
        assert!(!EventInput::from_value(&json!({})).notify);
    }

    #[test]
    fn test_notify_time_prefers_camel_case() {
        let input = EventInput::from_value(&json!({ "notifyTime": "15", "notify_time": 30 }));
        assert_eq!(input.notify_time, NotifyTime::Minutes(15));

        let input = EventInput::from_value(&json!({ "notify_time": 30 }));
        assert_eq!(input.notify_time, NotifyTime::Minutes(30));

        let input = EventInput::from_value(&json!({ "notifyTime": "soon" }));
        assert_eq!(input.notify_time, NotifyTime::NotANumber);

        let input = EventInput::from_value(&json!({ "notifyTime": 7.9 }));
        assert_eq!(input.notify_time, NotifyTime::Minutes(7));

        assert_eq!(
            EventInput::from_value(&json!({})).notify_time,
            NotifyTime::Absent
        );
    }

    #[test]
    fn test_non_object_body_has_no_fields() {
        let input = EventInput::from_value(&json!(["title"]));

        assert_eq!(input.title, None);
        assert!(!input.notify);
    }
}
