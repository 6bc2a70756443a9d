//! Measurement block loading
//!
//! The measurement block starts a fixed number of lines after the second
//! blank row. Its columns are the bin identifier, the bin label and one
//! column per sample; each row is one size class.

use tracing::debug;

use super::scanner::BlankRows;
use super::source::{ExportSource, tokenize_line};
use super::stats::ParseStats;
use crate::app::models::{Cell, Table};
use crate::config::ParserConfig;
use crate::{Error, Result};

const SECTION: &str = "measurement";

/// Columns preceding the sample columns: bin identifier and bin label
pub const LEADING_COLUMNS: usize = 2;

/// Load up to `max_measurement_rows` size-class rows
pub fn load_measurements(
    source: &ExportSource,
    blanks: &BlankRows,
    config: &ParserConfig,
    stats: &mut ParseStats,
) -> Result<Table> {
    debug!("Reading measurement table");

    let header_number = blanks.second + config.measurement_header_offset + 1;
    let header_line = source.line(header_number).ok_or_else(|| {
        Error::read(
            SECTION,
            format!(
                "missing header at line {} (file has {} lines)",
                header_number,
                source.line_count()
            ),
            None,
        )
    })?;
    let header = tokenize_line(header_line, config.delimiter, config.table_quote)
        .map_err(|e| Error::read(SECTION, format!("header at line {}", header_number), Some(e)))?;
    if header.len() < LEADING_COLUMNS {
        return Err(Error::read(
            SECTION,
            format!(
                "header at line {} has {} columns, expected at least {}",
                header_number,
                header.len(),
                LEADING_COLUMNS
            ),
            None,
        ));
    }

    let index_name = header[0].clone();
    let mut table = Table::new(index_name, header.clone());
    for (number, line) in source.lines_from(header_number + 1) {
        if table.row_count() == config.max_measurement_rows {
            break;
        }
        let tokens = tokenize_line(line, config.delimiter, config.table_quote)
            .map_err(|e| Error::read(SECTION, format!("line {}", number), Some(e)))?;
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() > header.len() {
            return Err(Error::read(
                SECTION,
                format!(
                    "line {}: expected {} fields, saw {}",
                    number,
                    header.len(),
                    tokens.len()
                ),
                None,
            ));
        }

        let mut cells: Vec<Cell> = tokens.iter().map(|token| Cell::from_raw(token)).collect();
        cells.resize(header.len(), Cell::Empty);
        table.push_row(table.row_count().to_string(), cells)?;
    }

    stats.measurement_rows = table.row_count();
    debug!(
        "Measurement table: {} rows x {} columns",
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

/// Convert leading-column cells that parse as numbers, leaving the rest as text
pub fn coerce_leading_column(measurements: &mut Table, stats: &mut ParseStats) {
    let mut coerced = 0;
    for cell in measurements.column_cells_mut(0) {
        let before = std::mem::take(cell);
        let was_text = matches!(before, Cell::Text(_));
        *cell = before.coerce_numeric();
        if was_text && matches!(cell, Cell::Number(_)) {
            coerced += 1;
        }
    }
    stats.leading_cells_coerced = coerced;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn load(text: &str, config: &ParserConfig) -> (Result<Table>, ParseStats) {
        let source = ExportSource::from_text("measure.txt", text);
        let mut stats = ParseStats::new();
        let blanks = BlankRows { first: 1, second: 2 };
        let result = load_measurements(&source, &blanks, config, &mut stats);
        (result, stats)
    }

    const BLOCK: &str = "\n\nDistribution\nunits\nBin\tSize\ts1\ts2\n1\t\"0,02\"\t\"1,5\"\t2\nA1\t0,03\t\t\"3,25\"\n";

    #[test]
    fn test_header_two_lines_after_second_blank() {
        let (result, stats) = load(BLOCK, &ParserConfig::default());
        let table = result.unwrap();

        assert_eq!(
            table.columns(),
            &["Bin", "Size", "s1", "s2"].map(String::from)
        );
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, "Size"), Some(&text("0,02")));
        assert_eq!(table.get(1, "s1"), Some(&Cell::Empty));
        assert_eq!(stats.measurement_rows, 2);
    }

    #[test]
    fn test_row_limit() {
        let config = ParserConfig::default().with_max_measurement_rows(1);
        let (result, _) = load(BLOCK, &config);
        assert_eq!(result.unwrap().row_count(), 1);
    }

    #[test]
    fn test_extra_fields_are_read_error() {
        let content = "\n\na\nb\nBin\tSize\n1\t2\t3\n";
        let (result, _) = load(content, &ParserConfig::default());
        assert!(matches!(result, Err(Error::Read { .. })));
    }

    #[test]
    fn test_missing_header_is_read_error() {
        let (result, _) = load("\n\nonly one line\n", &ParserConfig::default());
        assert!(matches!(result, Err(Error::Read { .. })));
    }

    #[test]
    fn test_leading_column_coercion_is_partial() {
        let mut table = Table::new("Bin", vec!["Bin".into(), "Size".into()]);
        table.push_row("0", vec![text("A1"), text("x")]).unwrap();
        table.push_row("1", vec![text("12,5"), text("y")]).unwrap();
        table.push_row("2", vec![Cell::Empty, text("z")]).unwrap();

        let mut stats = ParseStats::new();
        coerce_leading_column(&mut table, &mut stats);

        assert_eq!(table.cell(0, 0), Some(&text("A1")));
        assert_eq!(table.cell(1, 0), Some(&Cell::Number(12.5)));
        assert_eq!(table.cell(2, 0), Some(&Cell::Empty));
        assert_eq!(table.cell(1, 1), Some(&text("y")));
        assert_eq!(stats.leading_cells_coerced, 1);
    }
}
