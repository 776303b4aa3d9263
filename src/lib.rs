//! # delivery-stats
//!
//! Delivery-time statistics for shipments, computed from milestone logs.
//!
//! Each shipment carries a product kind and a JSON-encoded list of
//! timestamped milestones. This crate derives a transit duration in days
//! from the *Booking Confirmed* and *Delivered to Consignee* milestones,
//! groups shipments by (calendar month, kind), and reports the mean and the
//! nearest-rank 90th percentile (tp90) of each group.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           delivery-stats                         │
//! │  ┌─────────┐    ┌────────────────────────────────┐    ┌────────┐ │
//! │  │ source  │───▶│              data              │───▶│ report │ │
//! │  │ (input) │    │ milestone → extract → aggregate│    │(output)│ │
//! │  └────┬────┘    │            → stats             │    └────────┘ │
//! │       │         └────────────────────────────────┘               │
//! │       ▼                                                          │
//! │  CsvSource | JsonSource                                          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: Row source abstraction ([`RowSource`] trait) with CSV and JSON implementations
//! - **[`data`]**: Milestone decoding, duration extraction, bucketing and statistics
//! - **[`report`]**: Text and JSON rendering of the results
//! - **[`config`]**: Layered settings (defaults, file, environment)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # CSV export with "kind" and "milestones" header columns
//! delivery-stats shipments.csv
//!
//! # Spreadsheet-style export addressed by column position, JSON output
//! delivery-stats --kind-column 8 --milestones-column 4 --output json shipments.csv
//! ```
//!
//! ### As a library
//!
//! ```
//! use delivery_stats::{Analysis, MilestoneLabels, RawShipmentRow};
//!
//! let rows = vec![RawShipmentRow::new(
//!     Some("fcl".to_string()),
//!     r#"[{"value": "Booking Confirmed", "dateTime": "2023-01-02T00:00:00Z"},
//!         {"value": "Delivered to Consignee", "dateTime": "2023-01-09T00:00:00Z"}]"#,
//! )];
//!
//! let analysis = Analysis::run(rows, &MilestoneLabels::default());
//! let stats = analysis.statistics();
//! for (month, kinds) in &stats.tp90 {
//!     for (kind, days) in kinds {
//!         println!("{month} {kind}: {days:.2} days");
//!     }
//! }
//! ```

pub mod config;
pub mod data;
pub mod report;
pub mod source;

// Re-export main types for convenience
pub use config::{InputSettings, Settings};
pub use data::{
    Analysis, Buckets, DeliveryStats, Milestone, MilestoneLabels, MonthKey, RunSummary,
    ShipmentRecord, ShipmentTiming, StatResult,
};
pub use report::Report;
pub use source::{
    open_source, ColumnRef, CsvOptions, CsvSource, InputFormat, JsonOptions, JsonSource,
    RawShipmentRow, RowSource, SourceError,
};
