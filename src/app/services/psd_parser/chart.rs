//! Distribution chart assembly
//!
//! Joins measurement columns back to the metadata through each sample's
//! label and builds a label x size-class table. Samples sharing a label
//! collapse onto one chart row, later values overwriting earlier ones.

use std::collections::HashMap;
use tracing::{debug, warn};

use super::measurement::LEADING_COLUMNS;
use super::stats::{ParseStats, SkipReason};
use crate::app::models::{Cell, Table, parse_decimal};
use crate::config::ParserConfig;
use crate::{Error, Result};

/// Sample identifier to chart label mapping, built from the metadata table
#[derive(Debug, Clone, Default)]
pub struct SampleLabels {
    labels: HashMap<String, Option<String>>,
}

impl SampleLabels {
    /// Collect every sample's label from `label_column`
    ///
    /// The first occurrence of a duplicated sample identifier wins.
    pub fn from_metadata(metadata: &Table, label_column: &str) -> Result<Self> {
        let col = metadata
            .column_position(label_column)
            .ok_or_else(|| Error::missing_column("metadata", label_column))?;

        let mut labels = HashMap::with_capacity(metadata.row_count());
        for (row, sample) in metadata.index().iter().enumerate() {
            let label = match metadata.cell(row, col) {
                Some(Cell::Empty) | None => None,
                Some(cell) => Some(cell.to_string()),
            };
            labels.entry(sample.clone()).or_insert(label);
        }
        Ok(Self { labels })
    }

    /// Label lookup: `None` when the sample is unknown, `Some(None)` when it has no label
    pub fn get(&self, sample: &str) -> Option<Option<&str>> {
        self.labels.get(sample).map(Option::as_deref)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Label x size-class chart with the size class of each column
#[derive(Debug, Clone)]
pub struct Chart {
    /// Rows keyed by label; reference column first, then one column per bin
    pub table: Table,
    /// Size class of each table column: text for the reference column and
    /// non-numeric bin labels, a number otherwise
    pub size_classes: Vec<Cell>,
}

/// Insertion-ordered label x size-class accumulator
#[derive(Debug, Default)]
struct ChartAccumulator {
    labels: Vec<String>,
    label_pos: HashMap<String, usize>,
    bins: Vec<Cell>,
    bin_pos: HashMap<String, usize>,
    values: Vec<HashMap<usize, Option<f64>>>,
}

impl ChartAccumulator {
    fn insert(&mut self, label: &str, bin: &Cell, value: Option<f64>) {
        let row = match self.label_pos.get(label) {
            Some(&row) => row,
            None => {
                self.labels.push(label.to_string());
                self.values.push(HashMap::new());
                self.label_pos.insert(label.to_string(), self.labels.len() - 1);
                self.labels.len() - 1
            }
        };
        let name = bin.to_string();
        let col = match self.bin_pos.get(&name) {
            Some(&col) => col,
            None => {
                self.bins.push(bin.clone());
                self.bin_pos.insert(name, self.bins.len() - 1);
                self.bins.len() - 1
            }
        };
        self.values[row].insert(col, value);
    }

    fn into_chart(self, reference_column: &str, reference_value: f64) -> Result<Chart> {
        let mut size_classes = Vec::with_capacity(self.bins.len() + 1);
        size_classes.push(Cell::Text(reference_column.to_string()));
        size_classes.extend(self.bins.iter().cloned());

        let columns = size_classes.iter().map(Cell::to_string).collect();
        let mut table = Table::new("label", columns);
        for (label, values) in self.labels.into_iter().zip(self.values) {
            let mut cells = Vec::with_capacity(self.bins.len() + 1);
            cells.push(Cell::Number(reference_value));
            cells.extend((0..self.bins.len()).map(|col| match values.get(&col) {
                Some(Some(value)) => Cell::Number(*value),
                _ => Cell::Empty,
            }));
            table.push_row(label, cells)?;
        }
        Ok(Chart {
            table,
            size_classes,
        })
    }
}

/// Size class for a bin-label cell: its number when numeric, otherwise its trimmed text
pub fn size_class(cell: &Cell) -> Option<Cell> {
    match cell {
        Cell::Empty => None,
        Cell::Number(number) => Some(Cell::Number(*number)),
        Cell::Text(text) => Some(match parse_decimal(text) {
            Some(number) => Cell::Number(number),
            None => Cell::Text(text.trim().to_string()),
        }),
    }
}

/// Build the label-keyed distribution chart
///
/// Only measurement columns before `column_window` are read. Points whose
/// sample is unknown, unlabelled or non-numeric are skipped and recorded.
pub fn assemble_chart(
    measurements: &Table,
    labels: &SampleLabels,
    column_window: usize,
    config: &ParserConfig,
    stats: &mut ParseStats,
) -> Result<Chart> {
    debug!("Building chart data from measurements");

    let window_end = column_window.min(measurements.column_count());
    stats.columns_outside_window = measurements.column_count() - window_end;
    if stats.columns_outside_window > 0 {
        warn!(
            "Column window of {} excludes {} measurement columns",
            column_window, stats.columns_outside_window
        );
    }

    let samples = measurements
        .columns()
        .get(LEADING_COLUMNS..window_end)
        .unwrap_or_default();

    let mut chart = ChartAccumulator::default();
    for (i, cells) in measurements.rows().iter().enumerate() {
        let row = i + 1;
        let Some(bin) = cells.get(1).and_then(size_class) else {
            warn!("Skipping measurement row {}: empty size-class label", row);
            continue;
        };

        for (offset, sample) in samples.iter().enumerate() {
            let cell = &cells[LEADING_COLUMNS + offset];
            let label = match labels.get(sample) {
                None => {
                    warn!("Skipping data point due to error: sample '{}' not in metadata", sample);
                    stats.skip(row, sample.as_str(), SkipReason::UnknownSample);
                    continue;
                }
                Some(None) => {
                    warn!("Skipping data point due to error: sample '{}' has no label", sample);
                    stats.skip(row, sample.as_str(), SkipReason::EmptyLabel);
                    continue;
                }
                Some(Some(label)) => label,
            };

            let value = match cell {
                Cell::Empty => None,
                Cell::Number(number) => Some(*number),
                Cell::Text(text) => match parse_decimal(text) {
                    Some(number) => Some(number),
                    None => {
                        warn!(
                            "Skipping data point due to error: could not convert '{}' to float (row {}, sample '{}')",
                            text, row, sample
                        );
                        stats.skip(row, sample.as_str(), SkipReason::NonNumeric(text.clone()));
                        continue;
                    }
                },
            };

            chart.insert(label, &bin, value);
            stats.data_points += 1;
        }
    }

    let chart = chart.into_chart(&config.reference_column, config.reference_value)?;
    stats.chart_rows = chart.table.row_count();
    debug!(
        "Chart table: {} labels x {} size classes",
        chart.table.row_count(),
        chart.size_classes.len() - 1
    );
    Ok(chart)
}
