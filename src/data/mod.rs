//! Data models and processing for shipment milestone logs.
//!
//! This module turns raw shipment rows into per-bucket delivery-time
//! statistics.
//!
//! ## Submodules
//!
//! - [`milestone`]: The [`Milestone`] model and payload decoding
//! - [`extract`]: Duration and month-key derivation ([`ShipmentTiming`], [`MonthKey`])
//! - [`aggregate`]: Grouping by (month, kind) into [`Buckets`]
//! - [`stats`]: Mean and nearest-rank tp90 reducers ([`DeliveryStats`])
//! - [`analysis`]: Runs a batch of rows through the pipeline ([`Analysis`])
//!
//! ## Data Flow
//!
//! ```text
//! RawShipmentRow (kind + JSON payload)
//!        │
//!        ▼
//! ShipmentRecord::from_row()  ── malformed payload ──▶ empty milestones (logged)
//!        │
//!        ▼
//! extract() ──▶ ShipmentTiming { duration_days, month }
//!        │
//!        ▼
//! Buckets::record()  ── no month ──▶ excluded
//!        │
//!        ▼
//! Buckets::statistics() ──▶ DeliveryStats { mean, tp90 }
//! ```

pub mod aggregate;
pub mod analysis;
pub mod extract;
pub mod milestone;
pub mod stats;

pub use aggregate::{AggregationKey, Buckets};
pub use analysis::{Analysis, RunSummary, ShipmentRecord, NULL_KIND};
pub use extract::{extract, MilestoneLabels, MonthKey, ShipmentTiming};
pub use milestone::{parse_milestones, Milestone};
pub use stats::{mean, nearest_rank, tp90, DeliveryStats, StatResult};
