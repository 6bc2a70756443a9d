//! Metadata block loading
//!
//! The metadata block sits between the two blank rows with one column per
//! sample and one row per attribute. It is transposed here so that each
//! sample becomes a row.

use tracing::{debug, warn};

use super::scanner::BlankRows;
use super::source::{ExportSource, tokenize_line};
use super::stats::ParseStats;
use crate::app::models::{Cell, Table, parse_decimal};
use crate::config::ParserConfig;
use crate::{Error, Result};

const SECTION: &str = "metadata";

/// Load the metadata block and transpose it to one row per sample
pub fn load_metadata(
    source: &ExportSource,
    blanks: &BlankRows,
    config: &ParserConfig,
    stats: &mut ParseStats,
) -> Result<Table> {
    debug!("Reading metadata table");

    let row_count = blanks.metadata_rows().ok_or_else(|| {
        Error::read(
            SECTION,
            format!(
                "blank rows at lines {} and {} leave no room for a header",
                blanks.first, blanks.second
            ),
            None,
        )
    })?;

    let header_number = blanks.first + 1;
    let header_line = source.line(header_number).ok_or_else(|| {
        Error::read(SECTION, format!("missing header at line {}", header_number), None)
    })?;
    let header = tokenize_line(header_line, config.delimiter, config.table_quote)
        .map_err(|e| Error::read(SECTION, format!("header at line {}", header_number), Some(e)))?;

    let (index_name, samples) = match header.split_first() {
        Some((index_name, samples)) if !samples.is_empty() => (index_name, samples.to_vec()),
        _ => {
            return Err(Error::read(
                SECTION,
                format!("header at line {} names no samples", header_number),
                None,
            ));
        }
    };
    warn_duplicate_samples(&samples);
    stats.metadata_samples = samples.len();

    let mut attributes = Table::new(index_name.clone(), samples);
    for (number, line) in source.lines_from(header_number + 1).take(row_count) {
        let tokens = match tokenize_line(line, config.delimiter, config.table_quote) {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!("Skipping malformed metadata line {}: {}", number, e);
                stats.metadata_lines_skipped += 1;
                continue;
            }
        };
        if tokens.len() > header.len() {
            warn!(
                "Skipping metadata line {}: expected {} fields, saw {}",
                number,
                header.len(),
                tokens.len()
            );
            stats.metadata_lines_skipped += 1;
            continue;
        }

        let mut tokens = tokens.into_iter();
        let attribute = tokens.next().unwrap_or_default();
        let mut cells: Vec<Cell> = tokens.map(|token| Cell::from_raw(&token)).collect();
        cells.resize(header.len() - 1, Cell::Empty);
        attributes.push_row(attribute, cells)?;
    }

    let metadata = attributes.transpose();
    debug!(
        "Metadata table: {} samples x {} attributes",
        metadata.row_count(),
        metadata.column_count()
    );
    Ok(metadata)
}

fn warn_duplicate_samples(samples: &[String]) {
    for (i, sample) in samples.iter().enumerate() {
        if samples[..i].contains(sample) {
            warn!(
                "Duplicate sample identifier '{}' in metadata header; lookups use the first",
                sample
            );
        }
    }
}

/// Drop samples whose attributes are all empty
pub fn drop_empty_samples(metadata: &mut Table, stats: &mut ParseStats) {
    let dropped = metadata.drop_empty_rows();
    if dropped > 0 {
        debug!("Dropped {} empty metadata rows", dropped);
    }
    stats.empty_samples_dropped = dropped;
}

/// Convert attributes from position `from` onwards to numbers
///
/// Columns named in `keep_as_text` are left alone. Any other non-empty
/// cell that is not a number fails the whole conversion.
pub fn coerce_numeric_attributes(
    metadata: &mut Table,
    from: usize,
    keep_as_text: &[&str],
) -> Result<()> {
    debug!("Converting numeric columns");
    let targets: Vec<usize> = (from..metadata.column_count())
        .filter(|&col| !keep_as_text.contains(&metadata.columns()[col].as_str()))
        .collect();

    for row in 0..metadata.row_count() {
        for &col in &targets {
            let converted = match metadata.cell(row, col) {
                Some(Cell::Text(text)) => match parse_decimal(text) {
                    Some(number) => Cell::Number(number),
                    None => {
                        return Err(Error::processing(format!(
                            "could not convert '{}' to a number in attribute '{}' of sample '{}'",
                            text,
                            metadata.columns()[col],
                            metadata.index()[row]
                        )));
                    }
                },
                _ => continue,
            };
            if let Some(cell) = metadata.cell_mut(row, col) {
                *cell = converted;
            }
        }
    }
    Ok(())
}
