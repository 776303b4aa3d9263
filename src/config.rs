//! Layered configuration.
//!
//! Settings are assembled from built-in defaults, an optional config file and
//! `DELIVERY_STATS__*` environment variables, in that order of precedence.
//! Command-line flags are applied on top by the binary.
//!
//! ```toml
//! [input]
//! format = "csv"
//! kind_column = "8"        # digits select a column by position
//! milestones_column = "4"
//! has_headers = true
//! delimiter = ","
//!
//! [milestones]
//! booking_confirmed = "Booking Confirmed"
//! delivered = "Delivered to Consignee"
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::data::MilestoneLabels;
use crate::source::InputFormat;

/// Prefix for environment overrides, e.g. `DELIVERY_STATS__INPUT__KIND_COLUMN`.
pub const ENV_PREFIX: &str = "DELIVERY_STATS";

/// Where and how shipment rows are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub format: InputFormat,
    /// Header name, or zero-based index when all digits.
    pub kind_column: String,
    /// Header name, or zero-based index when all digits.
    pub milestones_column: String,
    /// CSV only.
    pub has_headers: bool,
    /// CSV only; must be a single byte.
    pub delimiter: String,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            format: InputFormat::Auto,
            kind_column: "kind".to_string(),
            milestones_column: "milestones".to_string(),
            has_headers: true,
            delimiter: ",".to_string(),
        }
    }
}

/// Complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input: InputSettings,
    pub milestones: MilestoneLabels,
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    ///
    /// A file that is named but missing or invalid is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`Settings::load`], reading overrides from `env` instead of the
    /// process environment when given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .source(env),
            )
            .build()
            .context("failed to load configuration")?;

        config
            .try_deserialize()
            .context("invalid configuration")
    }
}

/// Command-line overrides, applied after every other layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub format: Option<InputFormat>,
    pub kind_column: Option<String>,
    pub milestones_column: Option<String>,
    pub delimiter: Option<char>,
    pub no_headers: bool,
}

impl Overrides {
    pub fn apply(&self, settings: &mut Settings) {
        let input = &mut settings.input;
        if let Some(format) = self.format {
            input.format = format;
        }
        if let Some(ref column) = self.kind_column {
            input.kind_column = column.clone();
        }
        if let Some(ref column) = self.milestones_column {
            input.milestones_column = column.clone();
        }
        if let Some(delimiter) = self.delimiter {
            input.delimiter = delimiter.to_string();
        }
        if self.no_headers {
            input.has_headers = false;
        }
    }
}
