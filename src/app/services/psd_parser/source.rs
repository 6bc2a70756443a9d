//! Export file decoding and line tokenisation
//!
//! Analyser exports are written as UTF-16 text. This module decodes the raw
//! bytes once and hands out 1-based lines plus a csv-backed tokeniser that
//! every pipeline stage shares.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{Error, Result};

/// Decoded export file content
#[derive(Debug, Clone)]
pub struct ExportSource {
    path: PathBuf,
    lines: Vec<String>,
}

impl ExportSource {
    /// Read and decode a UTF-16 export file
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            Error::io(format!("Failed to read file {}", path.display()), e)
        })?;
        let text = decode_utf16(&bytes).map_err(|message| Error::decoding(path, message))?;
        debug!(
            "Decoded {} bytes from {} into {} characters",
            bytes.len(),
            path.display(),
            text.len()
        );
        Ok(Self::from_text(path, &text))
    }

    /// Build a source from already decoded text
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line by 1-based number
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    /// Iterate lines from a 1-based number onwards, paired with their numbers
    pub fn lines_from(&self, number: usize) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .skip(number.saturating_sub(1))
            .map(|(i, line)| (i + 1, line.as_str()))
    }
}

/// Decode UTF-16 bytes, honouring a byte-order mark and defaulting to little-endian
pub fn decode_utf16(bytes: &[u8]) -> std::result::Result<String, String> {
    let (body, big_endian) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (rest, false),
        [0xFE, 0xFF, rest @ ..] => (rest, true),
        _ => (bytes, false),
    };

    if body.len() % 2 != 0 {
        return Err(format!(
            "odd number of bytes ({}) in UTF-16 content",
            body.len()
        ));
    }

    let units = body.chunks_exact(2).map(|pair| {
        if big_endian {
            u16::from_be_bytes([pair[0], pair[1]])
        } else {
            u16::from_le_bytes([pair[0], pair[1]])
        }
    });

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| format!("invalid UTF-16 sequence: {}", e))
}

/// Split one line into fields
///
/// A line with no content yields no fields at all.
pub fn tokenize_line(
    line: &str,
    delimiter: u8,
    quote: u8,
) -> std::result::Result<Vec<String>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .quote(quote)
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    if reader.read_record(&mut record)? {
        Ok(record.iter().map(str::to_string).collect())
    } else {
        Ok(Vec::new())
    }
}
