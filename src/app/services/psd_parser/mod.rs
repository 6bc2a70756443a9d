//! Parser for particle size distribution analyser exports
//!
//! This module turns a single UTF-16, tab-delimited analyser export into
//! long-format records, one per sample and size class.
//!
//! ## Architecture
//!
//! The parser is organized into pipeline stages, each consuming the
//! previous stage's output:
//! - [`source`] - UTF-16 decoding and line tokenisation
//! - [`scanner`] - Blank-row marker detection
//! - [`metadata`] - Metadata block loading and transposition
//! - [`measurement`] - Measurement block loading and leading-column coercion
//! - [`chart`] - Label-keyed distribution chart assembly
//! - [`label`] - Label decomposition into method, trial, form and batch
//! - [`unpivot`] - Wide to long reshaping
//! - [`parser`] - Pipeline orchestration
//! - [`stats`] - Diagnostics context and result structures
//!
//! ## Usage
//!
//! ```no_run
//! use psd_parser::{ParserConfig, PsdParser};
//!
//! # fn example() -> psd_parser::Result<()> {
//! let parser = PsdParser::new(ParserConfig::default())?;
//! let result = parser.parse_file(std::path::Path::new("export.txt"))?;
//!
//! println!("Parsed {} records from {} size classes",
//!          result.records.len(),
//!          result.stats.measurement_rows);
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod label;
pub mod measurement;
pub mod metadata;
pub mod parser;
pub mod scanner;
pub mod source;
pub mod stats;
pub mod unpivot;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use chart::Chart;
pub use label::{DecomposedLabel, LabelDecomposer};
pub use parser::PsdParser;
pub use scanner::BlankRows;
pub use source::ExportSource;
pub use stats::{ParseResult, ParseStats, SkipReason, SkippedPoint};
