//! JSON-based row source.
//!
//! Accepts either a single JSON array of row objects or JSON Lines (one
//! object per line):
//!
//! ```json
//! [
//!   { "kind": "fcl", "milestones": "[{\"value\": \"Booking Confirmed\", ...}]" },
//!   { "kind": null,  "milestones": [{ "value": "Booking Confirmed", ... }] }
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use super::{RawShipmentRow, RowSource, SourceError};

/// Field names to read from each row object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonOptions {
    pub kind_key: String,
    pub milestones_key: String,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            kind_key: "kind".to_string(),
            milestones_key: "milestones".to_string(),
        }
    }
}

/// A row source that reads shipments from a JSON or JSON Lines file.
///
/// Objects without the kind key are skipped. A null or empty kind is
/// reported as `None`. The milestones field may hold the payload as a string
/// or as an inline array.
#[derive(Debug)]
pub struct JsonSource {
    path: PathBuf,
    description: String,
    options: JsonOptions,
}

impl JsonSource {
    /// Create a new JSON source for the given path.
    pub fn new<P: AsRef<Path>>(path: P, options: JsonOptions) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("json: {}", path.display());
        Self {
            path,
            description,
            options,
        }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowSource for JsonSource {
    fn read_rows(&mut self) -> Result<Vec<RawShipmentRow>, SourceError> {
        let content = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let rows = parse_json_rows(&content, &self.options)?;
        debug!(source = %self.description, rows = rows.len(), "read shipment rows");
        Ok(rows)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Parse rows from a JSON array document or from JSON Lines.
pub(crate) fn parse_json_rows(
    content: &str,
    options: &JsonOptions,
) -> Result<Vec<RawShipmentRow>, SourceError> {
    let objects: Vec<(usize, Value)> = if content.trim_start().starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(content).map_err(|source| {
            SourceError::Json {
                line: source.line(),
                source,
            }
        })?;
        values.into_iter().enumerate().map(|(i, v)| (i + 1, v)).collect()
    } else {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str::<Value>(line)
                    .map(|v| (i + 1, v))
                    .map_err(|source| SourceError::Json { line: i + 1, source })
            })
            .collect::<Result<_, _>>()?
    };

    let mut rows = Vec::with_capacity(objects.len());
    let mut skipped = 0usize;

    for (position, value) in objects {
        let Value::Object(object) = value else {
            return Err(SourceError::InvalidShape(format!(
                "row {} is not a JSON object",
                position
            )));
        };
        match row_from_object(&object, options) {
            Some(row) => rows.push(row),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(skipped, "skipped rows without a kind field");
    }

    Ok(rows)
}

fn row_from_object(object: &Map<String, Value>, options: &JsonOptions) -> Option<RawShipmentRow> {
    let kind = match object.get(&options.kind_key)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    };

    let milestones = match object.get(&options.milestones_key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    Some(RawShipmentRow::new(kind, milestones))
}
