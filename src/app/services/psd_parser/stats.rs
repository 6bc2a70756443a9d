//! Parsing statistics and result structures for particle size exports
//!
//! [`ParseStats`] is the diagnostics context threaded through every stage of
//! the pipeline. Stages record what they read, dropped and skipped here in
//! addition to emitting tracing events.

use crate::app::models::UnpivotedRecord;
use serde::Serialize;
use std::fmt;

/// Parsing result with records and statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Long-format records, one per sample and size class
    pub records: Vec<UnpivotedRecord>,

    /// Statistics gathered along the way
    pub stats: ParseStats,
}

/// Why a measurement data point was left out of the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SkipReason {
    /// Sample identifier has no metadata column
    UnknownSample,
    /// Sample has no label to key the chart row
    EmptyLabel,
    /// Cell could not be converted to a number
    NonNumeric(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownSample => write!(f, "sample not found in metadata"),
            SkipReason::EmptyLabel => write!(f, "sample has an empty label"),
            SkipReason::NonNumeric(raw) => write!(f, "could not convert '{}' to a number", raw),
        }
    }
}

/// A data point skipped during chart assembly
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedPoint {
    /// 1-based measurement row
    pub row: usize,
    /// Sample identifier from the measurement header
    pub sample: String,
    pub reason: SkipReason,
}

/// Pipeline statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseStats {
    /// Lines read while locating the blank-row markers
    pub lines_scanned: usize,

    /// 1-based line numbers of the blank-row markers
    pub blank_rows: Vec<usize>,

    /// Samples found in the metadata header
    pub metadata_samples: usize,

    /// Metadata lines skipped as malformed
    pub metadata_lines_skipped: usize,

    /// Sample rows dropped because every attribute was empty
    pub empty_samples_dropped: usize,

    /// Size-class rows read from the measurement block
    pub measurement_rows: usize,

    /// Leading-column cells converted to numbers
    pub leading_cells_coerced: usize,

    /// Sample columns excluded by the chart column window
    pub columns_outside_window: usize,

    /// Data points stored in the chart
    pub data_points: usize,

    /// Data points skipped, with their causes
    pub skipped_points: Vec<SkippedPoint>,

    /// Rows in the assembled chart
    pub chart_rows: usize,

    /// Records emitted by the unpivot step
    pub records: usize,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a skipped data point
    pub fn skip(&mut self, row: usize, sample: impl Into<String>, reason: SkipReason) {
        self.skipped_points.push(SkippedPoint {
            row,
            sample: sample.into(),
            reason,
        });
    }

    /// Share of measurement data points that made it into the chart
    pub fn success_rate(&self) -> f64 {
        let total = self.data_points + self.skipped_points.len();
        if total == 0 {
            0.0
        } else {
            (self.data_points as f64 / total as f64) * 100.0
        }
    }
}
