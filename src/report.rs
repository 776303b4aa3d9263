//! Rendering of delivery statistics for humans and machines.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::{DeliveryStats, RunSummary, StatResult};

/// Heading printed above the mean block.
pub const MEAN_HEADING: &str = "Average Delivery Time for each product type for each month:";
/// Heading printed above the tp90 block.
pub const TP90_HEADING: &str = "tp90 Delivery Time for each product type for each month:";

/// Everything a run reports.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub summary: &'a RunSummary,
    pub mean: &'a StatResult,
    pub tp90: &'a StatResult,
}

impl<'a> Report<'a> {
    pub fn new(summary: &'a RunSummary, stats: &'a DeliveryStats) -> Self {
        Self {
            summary,
            mean: &stats.mean,
            tp90: &stats.tp90,
        }
    }

    /// Plain-text report, one line per (month, kind) and statistic.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(MEAN_HEADING);
        out.push('\n');
        write_stat_lines(&mut out, self.mean);
        out.push('\n');
        out.push_str(TP90_HEADING);
        out.push('\n');
        write_stat_lines(&mut out, self.tp90);
        out
    }

    /// Pretty-printed JSON report.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize report")
    }

    /// Write the JSON report to a file.
    pub fn export(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }
}

fn write_stat_lines(out: &mut String, result: &StatResult) {
    for (month, kinds) in result {
        for (kind, days) in kinds {
            // Writing to a String cannot fail.
            let _ = writeln!(
                out,
                "Month: {}, Product Type: {}, Delivery Time: {:.2} days",
                month, kind, days
            );
        }
    }
}
