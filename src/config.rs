//! Configuration management and validation.
//!
//! Provides the parser configuration with defaults matching the analyser's
//! fixed export format, layered loading from an optional JSON file, and
//! validation rules.

use crate::constants::{
    COMMENT_1, COMMENT_2, CONFIG_DIR_NAME, CONFIG_FILE_NAME, FIELD_DELIMITER,
    MAX_MEASUREMENT_ROWS, MEASUREMENT_HEADER_OFFSET, NUMERIC_METADATA_FROM, REFERENCE_COLUMN,
    REFERENCE_VALUE, SCAN_QUOTE, TABLE_QUOTE,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Column window applied to measurement rows when assembling the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleWindow {
    /// Only the first `blank_row_1` measurement columns are considered
    BlankLineBound,
    /// Every measurement column is considered
    AllColumns,
}

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Field delimiter
    pub delimiter: u8,

    /// Quote character for the blank-row scan
    pub scan_quote: u8,

    /// Quote character for the metadata and measurement blocks
    pub table_quote: u8,

    /// Lines skipped between the second blank row and the measurement header
    pub measurement_header_offset: usize,

    /// Maximum number of measurement rows to read
    pub max_measurement_rows: usize,

    /// Name of the constant column prepended to the chart
    pub reference_column: String,

    /// Value of the constant reference column
    pub reference_value: f64,

    /// Metadata attribute renamed to `MRA_no`
    pub mra_source_column: String,

    /// Metadata attribute renamed to `Label_OU_SR` and used as the chart row key
    pub label_source_column: String,

    /// Column window for chart assembly
    pub sample_window: SampleWindow,

    /// First metadata attribute position converted to numbers
    pub numeric_metadata_from: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: FIELD_DELIMITER,
            scan_quote: SCAN_QUOTE,
            table_quote: TABLE_QUOTE,
            measurement_header_offset: MEASUREMENT_HEADER_OFFSET,
            max_measurement_rows: MAX_MEASUREMENT_ROWS,
            reference_column: REFERENCE_COLUMN.to_string(),
            reference_value: REFERENCE_VALUE,
            mra_source_column: COMMENT_1.to_string(),
            label_source_column: COMMENT_2.to_string(),
            sample_window: SampleWindow::BlankLineBound,
            numeric_metadata_from: NUMERIC_METADATA_FROM,
        }
    }
}

impl ParserConfig {
    /// Default location of the configuration file, if a config directory exists
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration from a JSON file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file {}", path.display()),
                e,
            )
        })?;
        let config: ParserConfig = serde_json::from_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Build configuration from defaults and an optional file
    ///
    /// An explicit path must exist. Without one the default location is used
    /// when present, otherwise built-in defaults apply.
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Ok(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Consider every measurement column during chart assembly
    pub fn with_all_sample_columns(mut self) -> Self {
        self.sample_window = SampleWindow::AllColumns;
        self
    }

    /// Set the maximum number of measurement rows
    pub fn with_max_measurement_rows(mut self, rows: usize) -> Self {
        self.max_measurement_rows = rows;
        self
    }

    /// Set the label source attribute
    pub fn with_label_source_column(mut self, column: impl Into<String>) -> Self {
        self.label_source_column = column.into();
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.max_measurement_rows == 0 {
            return Err(Error::configuration(
                "max_measurement_rows must be greater than zero",
            ));
        }
        if self.delimiter == self.scan_quote || self.delimiter == self.table_quote {
            return Err(Error::configuration(
                "Delimiter must differ from the quote characters",
            ));
        }
        if self.reference_column.trim().is_empty() {
            return Err(Error::configuration("reference_column must not be empty"));
        }
        if self.label_source_column.trim().is_empty() {
            return Err(Error::configuration("label_source_column must not be empty"));
        }
        Ok(())
    }
}
