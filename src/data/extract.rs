//! Duration and month-key extraction from a milestone sequence.

use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset};
use serde::{Deserialize, Serialize, Serializer};

use super::milestone::Milestone;

/// English month abbreviations, independent of the host locale.
const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Milestone labels bounding the measured transit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MilestoneLabels {
    /// Label of the start event.
    pub booking_confirmed: String,
    /// Label of the end event.
    pub delivered: String,
}

impl Default for MilestoneLabels {
    fn default() -> Self {
        Self {
            booking_confirmed: "Booking Confirmed".to_string(),
            delivered: "Delivered to Consignee".to_string(),
        }
    }
}

/// Calendar month used as a grouping key.
///
/// Orders chronologically and displays as `Jan'23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    /// 1-based.
    month: u32,
}

impl MonthKey {
    /// Returns `None` unless `month` is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Month of the timestamp, read in the timestamp's own offset.
    pub fn from_timestamp(ts: &DateTime<FixedOffset>) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = MONTH_ABBREVIATIONS[(self.month - 1) as usize];
        write!(f, "{}'{:02}", name, self.year.rem_euclid(100))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What a single shipment contributes to aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipmentTiming {
    /// Whole days from booking confirmation to delivery, or `0.0` when either is missing.
    pub duration_days: f64,
    /// Month of the first timestamped milestone.
    pub month: Option<MonthKey>,
    endpoints_found: bool,
}

impl ShipmentTiming {
    /// Whether both endpoint milestones carried a timestamp.
    pub fn has_endpoints(&self) -> bool {
        self.endpoints_found
    }
}

/// Derive the duration and month key of one shipment.
///
/// The two derivations are independent: the duration uses the *last*
/// timestamped occurrence of each endpoint label, while the month comes from
/// the *first* timestamped milestone of any label.
pub fn extract(milestones: &[Milestone], labels: &MilestoneLabels) -> ShipmentTiming {
    let span = endpoint_span_days(milestones, labels);
    ShipmentTiming {
        duration_days: span.map_or(0.0, |days| days as f64),
        month: month_key(milestones),
        endpoints_found: span.is_some(),
    }
}

/// Days between the last booking confirmation and the last delivery.
///
/// Truncates toward zero and may be negative when the events are inverted.
pub fn endpoint_span_days(milestones: &[Milestone], labels: &MilestoneLabels) -> Option<i64> {
    let mut booked = None;
    let mut delivered = None;

    for milestone in milestones {
        let Some(ts) = milestone.timestamp else {
            continue;
        };
        if milestone.label == labels.booking_confirmed {
            booked = Some(ts);
        } else if milestone.label == labels.delivered {
            delivered = Some(ts);
        }
    }

    let (booked, delivered) = (booked?, delivered?);
    Some(delivered.signed_duration_since(booked).num_days())
}

/// Month of the first milestone with a usable timestamp.
pub fn month_key(milestones: &[Milestone]) -> Option<MonthKey> {
    milestones
        .iter()
        .find_map(|m| m.timestamp.as_ref())
        .map(MonthKey::from_timestamp)
}
