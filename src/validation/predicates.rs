// src/validation/predicates.rs
//! Scalar predicates. All pure, none perform I/O.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[\d\s\-\(\)]{10,}$").expect("phone pattern is valid")
});

static API_KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("api key pattern is valid"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Any absolute URL the `url` crate can parse, regardless of scheme.
pub fn is_valid_url(url: &str) -> bool {
    url::Url::parse(url).is_ok()
}

/// Loose international format: optional `+`, then at least ten digits,
/// spaces, dashes or parentheses.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

/// A value counts as present unless it is missing, `null`, or an empty string.
pub fn is_required(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Character count within `min..=max`.
pub fn is_valid_length(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}

pub fn is_in_range(value: f64, min: f64, max: f64) -> bool {
    !value.is_nan() && value >= min && value <= max
}

/// Numeric reading of a JSON value: numbers, and strings that parse as numbers.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Parses the date formats accepted by the validators.
///
/// Date-only values are read as midnight UTC.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt.and_utc());
        }
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}

pub fn is_valid_date(input: &str) -> bool {
    parse_date(input).is_some()
}

pub fn is_future_date(input: &str) -> bool {
    parse_date(input).is_some_and(|date| date > Utc::now())
}

pub fn is_past_date(input: &str) -> bool {
    parse_date(input).is_some_and(|date| date < Utc::now())
}

/// Letters, digits, `_` and `-` only; optionally an exact length.
pub fn is_valid_api_key(key: &str, expected_length: Option<usize>) -> bool {
    if key.is_empty() {
        return false;
    }
    if let Some(expected) = expected_length {
        if key.len() != expected {
            return false;
        }
    }
    API_KEY_PATTERN.is_match(key)
}

pub fn is_valid_json(input: &str) -> bool {
    serde_json::from_str::<Value>(input).is_ok()
}
