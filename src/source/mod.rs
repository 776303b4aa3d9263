//! Row source abstraction for reading shipment rows.
//!
//! A row source locates the product-kind and milestone-payload fields in
//! some tabular input and yields one [`RawShipmentRow`] per shipment. Rows
//! where the kind field is structurally absent are dropped here; a present
//! but empty kind is passed on as `None`.

mod csv;
mod error;
mod json;

pub use self::csv::{CsvOptions, CsvSource};
pub use error::SourceError;
pub use json::{JsonOptions, JsonSource};

use std::fmt::{self, Debug};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::InputSettings;

/// One shipment as read from the input, before any decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawShipmentRow {
    /// Product kind (e.g. "fcl", "lcl"), `None` when the field was empty or null.
    pub kind: Option<String>,
    /// Milestone payload as JSON text.
    pub milestones: String,
}

impl RawShipmentRow {
    pub fn new(kind: Option<String>, milestones: impl Into<String>) -> Self {
        Self {
            kind,
            milestones: milestones.into(),
        }
    }
}

/// Trait for reading a batch of shipment rows.
///
/// # Example
///
/// ```no_run
/// use delivery_stats::{CsvOptions, CsvSource, RowSource};
///
/// let mut source = CsvSource::new("shipments.csv", CsvOptions::default());
/// let rows = source.read_rows()?;
/// println!("Read {} rows from {}", rows.len(), source.description());
/// # Ok::<(), delivery_stats::SourceError>(())
/// ```
pub trait RowSource: Debug {
    /// Read every row of the input.
    fn read_rows(&mut self) -> Result<Vec<RawShipmentRow>, SourceError>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}

/// A column selected by header name or zero-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Name(String),
    Index(usize),
}

impl ColumnRef {
    /// Digits-only text selects by position, anything else by name.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = s.parse() {
                return ColumnRef::Index(index);
            }
        }
        ColumnRef::Name(s.to_string())
    }
}

impl FromStr for ColumnRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ColumnRef::parse(s))
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Name(name) => write!(f, "\"{}\"", name),
            ColumnRef::Index(index) => write!(f, "#{}", index),
        }
    }
}

/// Input file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Pick by file extension: `.json`/`.jsonl` as JSON, anything else as CSV.
    #[default]
    Auto,
    Csv,
    Json,
}

impl InputFormat {
    /// Resolve `Auto` against a path.
    pub fn resolve(self, path: &Path) -> InputFormat {
        match self {
            InputFormat::Auto => {
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(str::to_ascii_lowercase);
                match ext.as_deref() {
                    Some("json") | Some("jsonl") | Some("ndjson") => InputFormat::Json,
                    _ => InputFormat::Csv,
                }
            }
            other => other,
        }
    }
}

/// Build the row source configured for `path`.
pub fn open_source(
    path: &Path,
    settings: &InputSettings,
) -> Result<Box<dyn RowSource>, SourceError> {
    let kind_column = ColumnRef::parse(&settings.kind_column);
    let milestones_column = ColumnRef::parse(&settings.milestones_column);

    match settings.format.resolve(path) {
        InputFormat::Json => {
            let (ColumnRef::Name(kind_key), ColumnRef::Name(milestones_key)) =
                (kind_column, milestones_column)
            else {
                return Err(SourceError::InvalidShape(
                    "JSON input requires named kind and milestones columns".to_string(),
                ));
            };
            Ok(Box::new(JsonSource::new(
                path,
                JsonOptions {
                    kind_key,
                    milestones_key,
                },
            )))
        }
        _ => {
            let delimiter = match settings.delimiter.as_bytes() {
                [b] => *b,
                _ => {
                    return Err(SourceError::InvalidShape(format!(
                        "CSV delimiter must be a single byte, got {:?}",
                        settings.delimiter
                    )))
                }
            };
            Ok(Box::new(CsvSource::new(
                path,
                CsvOptions {
                    kind_column,
                    milestones_column,
                    has_headers: settings.has_headers,
                    delimiter,
                },
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_ref_parse() {
        assert_eq!(ColumnRef::parse("8"), ColumnRef::Index(8));
        assert_eq!(ColumnRef::parse(" 4 "), ColumnRef::Index(4));
        assert_eq!(ColumnRef::parse("kind"), ColumnRef::Name("kind".to_string()));
        assert_eq!(ColumnRef::parse("col4"), ColumnRef::Name("col4".to_string()));
        assert_eq!(ColumnRef::parse("-1"), ColumnRef::Name("-1".to_string()));
    }

    #[test]
    fn test_input_format_resolve() {
        assert_eq!(InputFormat::Auto.resolve(Path::new("a.json")), InputFormat::Json);
        assert_eq!(InputFormat::Auto.resolve(Path::new("a.JSONL")), InputFormat::Json);
        assert_eq!(InputFormat::Auto.resolve(Path::new("a.csv")), InputFormat::Csv);
        assert_eq!(InputFormat::Auto.resolve(Path::new("data")), InputFormat::Csv);
        assert_eq!(InputFormat::Csv.resolve(Path::new("a.json")), InputFormat::Csv);
    }

    #[test]
    fn test_open_source_rejects_indexed_json_columns() {
        let settings = InputSettings {
            kind_column: "8".to_string(),
            ..InputSettings::default()
        };
        let err = open_source(Path::new("rows.json"), &settings).unwrap_err();
        assert!(matches!(err, SourceError::InvalidShape(_)));
    }

    #[test]
    fn test_open_source_rejects_multibyte_delimiter() {
        let settings = InputSettings {
            delimiter: ";;".to_string(),
            ..InputSettings::default()
        };
        let err = open_source(Path::new("rows.csv"), &settings).unwrap_err();
        assert!(matches!(err, SourceError::InvalidShape(_)));
    }

    #[test]
    fn test_open_source_describes_input() {
        let source = open_source(Path::new("rows.csv"), &InputSettings::default()).unwrap();
        assert_eq!(source.description(), "csv: rows.csv");
    }
}
