//! Type classification for scalar values
//!
//! Text is checked against literal patterns in a fixed order (integer,
//! decimal, boolean, timestamp) before falling back to plain text, so a
//! string such as `"123"` is always classified as an integer.

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{Size, TypeTag};
use super::value::Value;

static INTEGER_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?[0-9]+$").unwrap());

static DECIMAL_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?[0-9]*\.?[0-9]+$").unwrap());

/// Parses date/time literals found in text values
pub trait TimestampParser: Send + Sync {
    /// Parse `text` as a timestamp, or return `None` if it is not one
    fn parse(&self, text: &str) -> Option<DateTime<FixedOffset>>;
}

/// Timestamp parser backed by `chrono`
///
/// Accepts RFC 3339 / RFC 2822 timestamps, ISO-like date-times without an
/// offset (read as UTC), plain dates (midnight UTC) and times of day
/// (on 2000-01-01 UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoTimestampParser;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

impl TimestampParser for ChronoTimestampParser {
    fn parse(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
            return Some(ts);
        }
        if let Ok(ts) = DateTime::parse_from_rfc2822(text) {
            return Some(ts);
        }

        let utc = FixedOffset::east_opt(0)?;

        if let Some(naive) = DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        {
            return Some(utc.from_utc_datetime(&naive));
        }
        if let Some(date) = DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        {
            return Some(utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
        }
        if let Some(time) = TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
        {
            let day = NaiveDate::from_ymd_opt(2000, 1, 1)?;
            return Some(utc.from_utc_datetime(&day.and_time(time)));
        }

        None
    }
}

/// Classify a value, returning its type tag and coerced value.
///
/// Only text values are coerced; every other value is returned borrowed.
pub fn classify<'a>(value: &'a Value, parser: &dyn TimestampParser) -> (TypeTag, Cow<'a, Value>) {
    match value {
        Value::Boolean(_) => (TypeTag::Boolean, Cow::Borrowed(value)),
        Value::Integer(_) => (TypeTag::Integer, Cow::Borrowed(value)),
        Value::Number(_) => (TypeTag::Number, Cow::Borrowed(value)),
        Value::Timestamp(_) => (TypeTag::Timestamp, Cow::Borrowed(value)),
        Value::Null => (TypeTag::Null, Cow::Borrowed(value)),
        Value::Text(text) => match classify_text(text, parser) {
            Some((tag, coerced)) => (tag, Cow::Owned(coerced)),
            None => (TypeTag::Text, Cow::Borrowed(value)),
        },
        Value::Bytes(_) | Value::List(_) | Value::Map(_) => {
            (TypeTag::Generic, Cow::Borrowed(value))
        }
    }
}

/// Detect a non-text literal inside a text value
fn classify_text(text: &str, parser: &dyn TimestampParser) -> Option<(TypeTag, Value)> {
    if INTEGER_LITERAL.is_match(text) {
        // Too large for i64: keep the integer tag, carry the magnitude as a float
        let coerced = match text.parse::<i64>() {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::Number(text.parse::<f64>().unwrap_or(f64::NAN)),
        };
        return Some((TypeTag::Integer, coerced));
    }

    if DECIMAL_LITERAL.is_match(text) {
        if let Ok(f) = text.parse::<f64>() {
            return Some((TypeTag::Number, Value::Number(f)));
        }
    }

    if text.eq_ignore_ascii_case("true") {
        return Some((TypeTag::Boolean, Value::Boolean(true)));
    }
    if text.eq_ignore_ascii_case("false") {
        return Some((TypeTag::Boolean, Value::Boolean(false)));
    }

    parser
        .parse(text)
        .map(|ts| (TypeTag::Timestamp, Value::Timestamp(ts)))
}

/// Size tracked for min/max statistics: character length for text, the
/// value itself for numbers
pub fn value_size(value: &Value) -> Option<Size> {
    match value {
        Value::Text(text) => Some(Size::Integer(
            i64::try_from(text.chars().count()).unwrap_or(i64::MAX),
        )),
        Value::Integer(i) => Some(Size::Integer(*i)),
        Value::Number(f) => Some(Size::Number(*f)),
        _ => None,
    }
}
