//! Blank-row marker detection
//!
//! A well-formed export holds two blank rows: the first closes the preamble,
//! the second closes the metadata block. Scanning stops at the second one.

use tracing::{debug, error};

use super::source::{ExportSource, tokenize_line};
use super::stats::ParseStats;
use crate::config::ParserConfig;
use crate::constants::REQUIRED_BLANK_ROWS;
use crate::{Error, Result};

/// 1-based line numbers of the two structural blank rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankRows {
    pub first: usize,
    pub second: usize,
}

impl BlankRows {
    /// Number of metadata data rows between the markers (excluding the header)
    pub fn metadata_rows(&self) -> Option<usize> {
        self.second.checked_sub(self.first)?.checked_sub(2)
    }
}

/// Whether a tokenised line counts as a blank-row marker
pub fn is_blank(tokens: &[String]) -> bool {
    tokens.first().is_none_or(|first| first.is_empty())
}

/// Locate the first two blank rows
pub fn scan_blank_rows(
    source: &ExportSource,
    config: &ParserConfig,
    stats: &mut ParseStats,
) -> Result<BlankRows> {
    debug!("Reading file to detect blank rows");
    let mut found = Vec::with_capacity(REQUIRED_BLANK_ROWS);

    for (number, line) in source.lines_from(1) {
        stats.lines_scanned = number;
        let tokens = tokenize_line(line, config.delimiter, config.scan_quote).map_err(|e| {
            Error::read("structure", format!("line {}: {}", number, e), Some(e))
        })?;

        if is_blank(&tokens) {
            found.push(number);
            debug!("Found blank row #{} at line {}", found.len(), number);
            if found.len() == REQUIRED_BLANK_ROWS {
                break;
            }
        }
    }

    stats.blank_rows = found.clone();

    match found.as_slice() {
        [first, second] => {
            debug!("First blank row at line {}, second at {}", first, second);
            Ok(BlankRows {
                first: *first,
                second: *second,
            })
        }
        _ => {
            let err = Error::structural(source.path(), found.len());
            error!("{}", err);
            Err(err)
        }
    }
}
