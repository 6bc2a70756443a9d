//! Particle Size Distribution Parser Library
//!
//! A Rust library for reshaping the tab-delimited, UTF-16 exports written by
//! laser-diffraction particle-size analysers into long-format records.
//!
//! This library provides tools for:
//! - Locating the blank-row markers that delimit the metadata and measurement blocks
//! - Loading and transposing the per-sample metadata block
//! - Loading the size-class measurement block with comma-decimal numbers
//! - Assembling a label-keyed distribution chart and decomposing sample labels
//! - Unpivoting the combined table into one record per sample and size class
//! - Wrapping the outcome in a success/error JSON envelope

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod psd_parser;
        pub mod response;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Cell, Table, UnpivotedRecord};
pub use app::services::psd_parser::{ParseResult, ParseStats, PsdParser};
pub use app::services::response::Response;
pub use config::ParserConfig;

use std::path::PathBuf;

/// Result type alias for the particle size parser
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error classification carried alongside every [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fewer than two blank-row markers were found
    Structural,
    /// A section of the file could not be read or decoded
    Read,
    /// Coercion, decomposition or reshaping failed
    Processing,
    /// No file path was supplied
    MissingArgument,
    /// Invalid configuration
    Configuration,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Structural => "StructuralError",
            ErrorKind::Read => "ReadError",
            ErrorKind::Processing => "ProcessingError",
            ErrorKind::MissingArgument => "MissingArgument",
            ErrorKind::Configuration => "ConfigurationError",
        };
        f.write_str(name)
    }
}

/// Error types for particle size export parsing
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid UTF-16 text
    #[error("Decoding error in file '{}': {message}", .path.display())]
    Decoding { path: PathBuf, message: String },

    /// Blank-row markers could not be located
    #[error(
        "Could not locate two distinct blank rows in '{}' (found {found}). Check file format.",
        .path.display()
    )]
    Structural { path: PathBuf, found: usize },

    /// A file section could not be tokenised
    #[error("Failed to read {section} section: {message}")]
    Read {
        section: &'static str,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Table reshaping or coercion failed
    #[error("Processing error: {message}")]
    Processing { message: String },

    /// A required column is not present in a table
    #[error("Column '{column}' not found in {table} table")]
    MissingColumn { table: &'static str, column: String },

    /// Two tables expected to line up row-by-row do not
    #[error("Row count mismatch: metadata has {metadata_rows} rows, chart has {chart_rows}")]
    RowCountMismatch {
        metadata_rows: usize,
        chart_rows: usize,
    },

    /// The pipeline completed without producing a single record
    #[error("The parser produced no records. Check the logs for details.")]
    NoRecords,

    /// No input file path was given
    #[error("The parser requires a file path as command line argument")]
    MissingArgument,

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a decoding error for a file
    pub fn decoding(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Decoding {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a structural error recording how many markers were seen
    pub fn structural(path: impl Into<PathBuf>, found: usize) -> Self {
        Self::Structural {
            path: path.into(),
            found,
        }
    }

    /// Create a section read error
    pub fn read(
        section: &'static str,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::Read {
            section,
            message: message.into(),
            source,
        }
    }

    /// Create a processing error
    pub fn processing(message: impl Into<String>) -> Self {
        Self::Processing {
            message: message.into(),
        }
    }

    /// Create a missing column error
    pub fn missing_column(table: &'static str, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            table,
            column: column.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Classify this error into one of the pipeline error kinds
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Structural { .. } => ErrorKind::Structural,
            Error::Io { .. } | Error::Decoding { .. } | Error::Read { .. } => ErrorKind::Read,
            Error::Processing { .. }
            | Error::MissingColumn { .. }
            | Error::RowCountMismatch { .. }
            | Error::NoRecords => ErrorKind::Processing,
            Error::MissingArgument => ErrorKind::MissingArgument,
            Error::Configuration { .. } => ErrorKind::Configuration,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Configuration {
            message: format!("Invalid JSON configuration: {}", error),
        }
    }
}
