//! Calendar event types.
//!
//! `CalendarEvent` is the persisted record. It is always fully populated:
//! defaults are applied once, either when a `NewEvent` becomes a record or
//! when a stored record is deserialized.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::DEFAULT_EVENT_COLOR;
use crate::date::parse_date_time;
use crate::error::DatebookError;

/// A point in time: a calendar day, optionally with a time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventDate {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl EventDate {
    /// Effective calendar day, used for date and month filtering.
    pub fn day(&self) -> NaiveDate {
        match self {
            EventDate::Date(d) => *d,
            EventDate::DateTime(dt) => dt.date(),
        }
    }

    /// Timestamp used for ordering. Plain dates sort at midnight.
    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            EventDate::Date(d) => d.and_time(NaiveTime::MIN),
            EventDate::DateTime(dt) => *dt,
        }
    }

    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            EventDate::Date(_) => None,
            EventDate::DateTime(dt) => Some(dt.time()),
        }
    }
}

impl From<NaiveDate> for EventDate {
    fn from(d: NaiveDate) -> Self {
        EventDate::Date(d)
    }
}

impl From<NaiveDateTime> for EventDate {
    fn from(dt: NaiveDateTime) -> Self {
        EventDate::DateTime(dt)
    }
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EventDate::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            // %.f writes only the significant sub-second digits
            EventDate::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

impl FromStr for EventDate {
    type Err = DatebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(d) = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
            return Ok(EventDate::Date(d));
        }
        parse_date_time(s).map(EventDate::DateTime)
    }
}

impl Serialize for EventDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EventDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

fn default_color() -> String {
    DEFAULT_EVENT_COLOR.to_string()
}

/// A stored calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Assigned by the store, never changed afterwards
    pub id: String,
    pub title: String,
    pub date: EventDate,
    /// Explicit start override; `date` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventDate>,
    /// Explicit end override; `date` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventDate>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CalendarEvent {
    pub fn effective_start(&self) -> EventDate {
        self.start.unwrap_or(self.date)
    }

    pub fn effective_end(&self) -> EventDate {
        self.end.unwrap_or(self.date)
    }

    /// Numeric value of the id's leading digits ("12abc" is 12).
    /// Ids without leading digits, negative or too large for `u64` count as 0.
    pub fn numeric_id(&self) -> u64 {
        let id = self.id.trim_start();
        let id = id.strip_prefix('+').unwrap_or(id);
        let digits = id.find(|c: char| !c.is_ascii_digit()).unwrap_or(id.len());

        id[..digits].parse().unwrap_or(0)
    }

    /// Re-apply the default color rule, e.g. after a caller blanked it.
    pub(crate) fn with_default_color(mut self, default_color: &str) -> Self {
        if self.color.trim().is_empty() {
            self.color = default_color.to_string();
        }
        self
    }
}

/// Fields of an event that doesn't have an id yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewEvent {
    pub title: String,
    pub date: Option<EventDate>,
    pub start: Option<EventDate>,
    pub end: Option<EventDate>,
    pub color: Option<String>,
    pub description: Option<String>,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, date: impl Into<EventDate>) -> Self {
        NewEvent {
            title: title.into(),
            date: Some(date.into()),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_start(mut self, start: impl Into<EventDate>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn with_end(mut self, end: impl Into<EventDate>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Apply defaults and produce a complete record.
    ///
    /// A missing `date` falls back to `start`, then to today.
    pub fn into_event(self, id: String, default_color: &str) -> CalendarEvent {
        let date = self
            .date
            .or(self.start)
            .unwrap_or_else(|| EventDate::Date(chrono::Local::now().date_naive()));

        let color = self
            .color
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| default_color.to_string());

        CalendarEvent {
            id,
            title: self.title,
            date,
            start: self.start,
            end: self.end,
            color,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_event_date_parses_both_shapes() {
        assert_eq!("2024-01-01".parse::<EventDate>().unwrap(), EventDate::Date(day(2024, 1, 1)));

        let timed: EventDate = "2024-01-01T09:30".parse().unwrap();
        assert_eq!(timed.day(), day(2024, 1, 1));
        assert_eq!(timed.to_string(), "2024-01-01T09:30:00");
    }

    #[test]
    fn test_event_date_serializes_as_string() {
        let json = serde_json::to_string(&EventDate::Date(day(2024, 2, 29))).unwrap();
        assert_eq!(json, "\"2024-02-29\"");
    }

    #[test]
    fn test_missing_color_gets_default_on_deserialize() {
        let event: CalendarEvent =
            serde_json::from_str(r#"{"id":"7","title":"Lunch","date":"2024-01-01T12:00:00.000Z"}"#)
                .unwrap();

        assert_eq!(event.color, DEFAULT_EVENT_COLOR);
        assert_eq!(event.date.time().map(|t| t.to_string()), Some("12:00:00".to_string()));
        assert_eq!(event.numeric_id(), 7);
    }

    #[test]
    fn test_into_event_applies_defaults() {
        let event = NewEvent::new("A", day(2024, 1, 1)).into_event("1".into(), DEFAULT_EVENT_COLOR);
        assert_eq!(event.color, DEFAULT_EVENT_COLOR);
        assert_eq!(event.effective_start(), EventDate::Date(day(2024, 1, 1)));

        let colored = NewEvent::new("B", day(2024, 1, 1))
            .with_color("#EF4444")
            .into_event("2".into(), DEFAULT_EVENT_COLOR);
        assert_eq!(colored.color, "#EF4444");
    }

    #[test]
    fn test_numeric_id_reads_leading_digits() {
        let numeric = |id: &str| {
            NewEvent::new("A", day(2024, 1, 1))
                .into_event(id.into(), DEFAULT_EVENT_COLOR)
                .numeric_id()
        };

        assert_eq!(numeric("12abc"), 12);
        assert_eq!(numeric(" 7"), 7);
        assert_eq!(numeric("+4"), 4);
        assert_eq!(numeric("abc"), 0);
        assert_eq!(numeric("-3"), 0);
        assert_eq!(numeric("99999999999999999999999"), 0);
    }

    #[test]
    fn test_event_date_keeps_sub_second_precision() {
        let dt = day(2024, 1, 1).and_hms_nano_opt(9, 30, 0, 123_456_789).unwrap();
        let text = EventDate::DateTime(dt).to_string();

        assert_eq!(text, "2024-01-01T09:30:00.123456789");
        assert_eq!(text.parse::<EventDate>().unwrap(), EventDate::DateTime(dt));
    }
}
