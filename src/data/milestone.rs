//! Milestone model and payload decoding.
//!
//! A shipment's milestones arrive as a JSON array embedded in a single
//! text cell. Each element carries a label (`value`) and an optional
//! timestamp (`dateTime`):
//!
//! ```json
//! [
//!   { "value": "Booking Confirmed", "dateTime": "2023-01-02T08:00:00+00:00" },
//!   { "value": "Gate In", "dateTime": null },
//!   { "value": "Delivered to Consignee", "dateTime": "2023-01-09T17:30:00+00:00" }
//! ]
//! ```

use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use tracing::debug;

/// ISO-8601 offset date-time without seconds, accepted alongside RFC 3339.
const MINUTE_PRECISION_FORMAT: &str = "%Y-%m-%dT%H:%M%#z";

/// One logged event in a shipment's lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Milestone {
    pub label: String,
    pub timestamp: Option<DateTime<FixedOffset>>,
}

impl Milestone {
    pub fn new(label: impl Into<String>, timestamp: Option<DateTime<FixedOffset>>) -> Self {
        Self {
            label: label.into(),
            timestamp,
        }
    }
}

/// Decode a milestone payload into milestones, preserving source order.
///
/// A blank payload decodes to an empty sequence. A payload that is not a
/// JSON array is an error; the caller decides how to recover. Irregular
/// elements inside the array never fail the payload: they decode to a
/// milestone with whatever label and timestamp can be read from them.
pub fn parse_milestones(payload: &str) -> Result<Vec<Milestone>, serde_json::Error> {
    if payload.trim().is_empty() {
        return Ok(Vec::new());
    }

    let elements: Vec<Value> = serde_json::from_str(payload)?;
    Ok(elements.iter().map(milestone_from_value).collect())
}

/// Decode one array element.
///
/// Non-object elements become a label-less milestone without a timestamp.
fn milestone_from_value(element: &Value) -> Milestone {
    let Value::Object(fields) = element else {
        return Milestone::new(String::new(), None);
    };

    let label = fields.get("value").map(label_text).unwrap_or_default();
    let timestamp = fields.get("dateTime").and_then(parse_timestamp_value);
    Milestone::new(label, timestamp)
}

/// Scalars render as text; null and containers give an empty label.
fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Interpret a `dateTime` JSON value.
///
/// Null, non-string values, the literal `"null"` and unparseable strings
/// all yield `None`.
fn parse_timestamp_value(value: &Value) -> Option<DateTime<FixedOffset>> {
    match value {
        Value::String(s) if s != "null" => parse_timestamp(s),
        _ => None,
    }
}

/// Parse an offset-aware ISO-8601 timestamp string.
///
/// Only the strict `T` date/time separator and an upper-case `Z` are
/// accepted; RFC 3339 alternatives such as a space or `t` are rejected.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    if !is_strict_iso(s) {
        debug!(value = s, "ignoring non-ISO milestone timestamp");
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts);
    }
    if let Ok(ts) = DateTime::parse_from_str(s, MINUTE_PRECISION_FORMAT) {
        return Some(ts);
    }

    debug!(value = s, "ignoring unparseable milestone timestamp");
    None
}

fn is_strict_iso(s: &str) -> bool {
    s.as_bytes().get(10) == Some(&b'T') && !s.ends_with('z')
}
