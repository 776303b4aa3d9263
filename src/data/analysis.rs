//! Per-run analysis: raw rows in, buckets and a run summary out.

use serde::Serialize;
use tracing::{debug, info, warn};

use super::aggregate::Buckets;
use super::extract::{extract, MilestoneLabels};
use super::milestone::{parse_milestones, Milestone};
use super::stats::DeliveryStats;
use crate::source::RawShipmentRow;

/// Kind assigned to shipments that carry none.
pub const NULL_KIND: &str = "NULL";

/// A shipment ready for extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentRecord {
    pub kind: String,
    pub milestones: Vec<Milestone>,
}

impl ShipmentRecord {
    pub fn new(kind: Option<String>, milestones: Vec<Milestone>) -> Self {
        Self {
            kind: kind.unwrap_or_else(|| NULL_KIND.to_string()),
            milestones,
        }
    }

    /// Build a record from a raw row, decoding its milestone payload.
    ///
    /// On a malformed payload the record gets no milestones and the decoding
    /// error is handed back alongside it.
    pub fn from_row(row: RawShipmentRow) -> (Self, Option<serde_json::Error>) {
        match parse_milestones(&row.milestones) {
            Ok(milestones) => (Self::new(row.kind, milestones), None),
            Err(e) => (Self::new(row.kind, Vec::new()), Some(e)),
        }
    }
}

/// Counters describing how a batch was processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Rows handed to the analysis.
    pub rows: usize,
    /// Rows whose milestone payload could not be decoded.
    pub malformed_payloads: usize,
    /// Rows lacking a timestamped booking confirmation or delivery; their duration is 0.
    pub missing_endpoints: usize,
    /// Rows without any timestamped milestone, left out of every bucket.
    pub excluded: usize,
    /// Rows that contributed a sample.
    pub aggregated: usize,
}

/// Result of analysing one batch.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub buckets: Buckets,
    pub summary: RunSummary,
}

impl Analysis {
    /// Run every row through decoding, extraction and aggregation.
    pub fn run<I>(rows: I, labels: &MilestoneLabels) -> Self
    where
        I: IntoIterator<Item = RawShipmentRow>,
    {
        let mut analysis = Analysis::default();

        for (index, row) in rows.into_iter().enumerate() {
            let (record, error) = ShipmentRecord::from_row(row);
            if let Some(e) = error {
                warn!(row = index, kind = %record.kind, error = %e, "malformed milestone payload");
                analysis.summary.malformed_payloads += 1;
            }
            analysis.add(index, &record, labels);
        }

        info!(
            rows = analysis.summary.rows,
            aggregated = analysis.summary.aggregated,
            excluded = analysis.summary.excluded,
            missing_endpoints = analysis.summary.missing_endpoints,
            malformed = analysis.summary.malformed_payloads,
            buckets = analysis.buckets.len(),
            "analysed shipments"
        );

        analysis
    }

    fn add(&mut self, index: usize, record: &ShipmentRecord, labels: &MilestoneLabels) {
        self.summary.rows += 1;

        let timing = extract(&record.milestones, labels);
        if !timing.has_endpoints() {
            self.summary.missing_endpoints += 1;
        }

        if self.buckets.record(&record.kind, &timing) {
            self.summary.aggregated += 1;
        } else {
            debug!(row = index, kind = %record.kind, "no timestamped milestone, excluding shipment");
            self.summary.excluded += 1;
        }
    }

    /// Mean and tp90 for every bucket.
    pub fn statistics(&self) -> DeliveryStats {
        self.buckets.statistics()
    }
}
