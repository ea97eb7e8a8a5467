// src/timestamp.rs
//! Timestamp resolution shared by the freshness index, pair sorting and the cache.
//!
//! Feeds deliver dates as strings in assorted formats or as numbers. Everything
//! resolves to Unix milliseconds; unknown or missing values resolve to 0 so they
//! lose every comparison.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A timestamp-like value as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Number(serde_json::Number),
    Text(String),
}

impl Timestamp {
    /// The raw value rendered as text (numbers keep their JSON spelling).
    pub fn as_text(&self) -> String {
        match self {
            Timestamp::Number(n) => n.to_string(),
            Timestamp::Text(s) => s.clone(),
        }
    }

    pub fn resolve(&self) -> i64 {
        resolve_str(&self.as_text())
    }
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Timestamp::Text(s.to_string())
    }
}

impl From<i64> for Timestamp {
    fn from(n: i64) -> Self {
        Timestamp::Number(n.into())
    }
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Resolve a raw value to Unix milliseconds.
///
/// Any finite number is taken as epoch milliseconds, however short, so small
/// synthetic timestamps still order. Otherwise RFC 3339, RFC 2822 and a few naive
/// `YYYY-MM-DD[ HH:MM[:SS]]` layouts (UTC) are tried.
pub fn resolve_str(raw: &str) -> i64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0;
    }
    if let Ok(n) = s.parse::<f64>() {
        if n.is_finite() {
            return n as i64;
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.timestamp_millis();
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return dt.timestamp_millis();
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return dt.and_utc().timestamp_millis();
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return dt.and_utc().timestamp_millis();
        }
    }
    0
}

/// Resolve an optional value; absent → 0.
pub fn resolve(ts: Option<&Timestamp>) -> i64 {
    ts.map(Timestamp::resolve).unwrap_or(0)
}
