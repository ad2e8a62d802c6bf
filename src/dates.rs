//! Parsing, formatting and (de)serialization of due dates
//!
//! Requests carry ISO-8601 UTC timestamps. Responses are parsed leniently,
//! since the service is not consistent about the shape it returns (RFC 3339,
//! `isoformat()` without an offset, dates without a time...). Values without
//! an offset are taken as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// The timestamp shape sent to the service (ISO-8601 UTC with milliseconds)
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
/// How due dates are displayed to the user (UK order, 24-hour clock)
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

/// The timestamp shapes a service response or a typed-in deadline may use
const LENIENT_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];
/// Date-only shapes, taken as midnight UTC
const LENIENT_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Try to make sense of a date, whatever shape it comes in.
///
/// Returns `None` for text no supported shape matches, so that callers can
/// decide what a sensible fallback is.
pub fn parse_lenient(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    for format in &LENIENT_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    for format in &LENIENT_DATE_FORMATS {
        if let Ok(naive) = NaiveDate::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive.and_hms_opt(0, 0, 0)?));
        }
    }

    None
}

/// Format a date the way requests to the service expect it
pub fn format_wire(date: &DateTime<Utc>) -> String {
    date.format(WIRE_FORMAT).to_string()
}

/// Format a date the way the task list displays it
pub fn format_display(date: &DateTime<Utc>) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Whether `date` falls on a day before the day of `now`.
///
/// This deliberately compares days, not instants: a deadline earlier today is
/// still accepted as "today or in the future".
pub fn is_before_today(date: &DateTime<Utc>, now: &DateTime<Utc>) -> bool {
    date.date_naive() < now.date_naive()
}

/// serde adapter for optional due-date fields, to be used with
/// `#[serde(with = "crate::dates::iso_serde")]`
pub mod iso_serde {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&super::format_wire(date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(text) => match super::parse_lenient(&text) {
                Some(date) => Ok(Some(date)),
                None => Err(serde::de::Error::custom(format!("unsupported date shape {:?}", text))),
            },
        }
    }
}
