//! Data models for particle size export processing
//!
//! This module contains the typed tabular structures the pipeline passes
//! between stages: a [`Cell`] value, an ordered [`Table`] with a row index,
//! and the final long-format [`UnpivotedRecord`].

use crate::{Error, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

// =============================================================================
// Cell Values
// =============================================================================

/// A single table cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Missing value
    #[default]
    Empty,
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
}

impl Cell {
    /// Wrap a raw token; blank tokens become [`Cell::Empty`]
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(raw.to_string())
        }
    }

    /// Replace text with its numeric form when it parses; other cells are unchanged
    pub fn coerce_numeric(self) -> Self {
        match self {
            Cell::Text(text) => match parse_decimal(&text) {
                Some(number) => Cell::Number(number),
                None => Cell::Text(text),
            },
            other => other,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Text content, if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric content, parsing text cells with comma-decimal tolerance
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(number) => Some(*number),
            Cell::Text(text) => parse_decimal(text),
            Cell::Empty => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(number) => f.write_str(&format_number(*number)),
            Cell::Text(text) => f.write_str(text),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cell::Number(number) if number.is_finite() => serializer.serialize_f64(*number),
            Cell::Text(text) => serializer.serialize_str(text),
            _ => serializer.serialize_none(),
        }
    }
}

/// Parse a number written with either `.` or `,` as decimal separator
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.matches(',').count() > 1 {
        return None;
    }
    trimmed.replace(',', ".").parse::<f64>().ok()
}

/// Render a number the way the analyser's downstream consumers expect (`1.0`, `0.12`)
pub fn format_number(number: f64) -> String {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < 1e16 {
        format!("{:.1}", number)
    } else {
        format!("{}", number)
    }
}

// =============================================================================
// Tables
// =============================================================================

/// An ordered table with named columns and a labelled row index
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Name of the row index
    pub index_name: String,
    columns: Vec<String>,
    index: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new(index_name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            index_name: index_name.into(),
            columns,
            index: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append a row; the cell count must equal the column count
    pub fn push_row(&mut self, label: impl Into<String>, cells: Vec<Cell>) -> Result<()> {
        if cells.len() != self.columns.len() {
            return Err(Error::processing(format!(
                "Row has {} cells but table has {} columns",
                cells.len(),
                self.columns.len()
            )));
        }
        self.index.push(label.into());
        self.rows.push(cells);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Position of a row by index label
    pub fn row_position(&self, label: &str) -> Option<usize> {
        self.index.iter().position(|row| row == label)
    }

    /// Cell at a row position and column name
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.column_position(column)?;
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    /// Cell at a row and column position
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row).and_then(|cells| cells.get_mut(col))
    }

    /// Mutable access to a whole column's cells
    pub fn column_cells_mut(&mut self, col: usize) -> impl Iterator<Item = &mut Cell> {
        self.rows.iter_mut().filter_map(move |cells| cells.get_mut(col))
    }

    /// Rename a column; returns false when it does not exist
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_position(from) {
            Some(pos) => {
                self.columns[pos] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Insert a column at `position` with one value per row
    pub fn insert_column(
        &mut self,
        position: usize,
        name: impl Into<String>,
        values: Vec<Cell>,
    ) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(Error::processing(format!(
                "Column has {} values but table has {} rows",
                values.len(),
                self.rows.len()
            )));
        }
        let position = position.min(self.columns.len());
        self.columns.insert(position, name.into());
        for (cells, value) in self.rows.iter_mut().zip(values) {
            cells.insert(position, value);
        }
        Ok(())
    }

    /// Swap rows and columns: column names become row labels and vice versa
    pub fn transpose(&self) -> Table {
        let mut transposed = Table::new(self.index_name.clone(), self.index.clone());
        for (col, name) in self.columns.iter().enumerate() {
            let cells = self
                .rows
                .iter()
                .map(|row| row.get(col).cloned().unwrap_or_default())
                .collect();
            transposed.index.push(name.clone());
            transposed.rows.push(cells);
        }
        transposed
    }

    /// Remove rows whose cells are all empty, returning how many were removed
    pub fn drop_empty_rows(&mut self) -> usize {
        let before = self.rows.len();
        let mut index = std::mem::take(&mut self.index).into_iter();
        let rows = std::mem::take(&mut self.rows);
        for cells in rows {
            let label = index.next().unwrap_or_default();
            if cells.iter().all(Cell::is_empty) {
                continue;
            }
            self.index.push(label);
            self.rows.push(cells);
        }
        before - self.rows.len()
    }

    /// Concatenate `other`'s columns to the right of this table, pairing rows by position
    pub fn join_by_position(&self, other: &Table) -> Result<Table> {
        if self.row_count() != other.row_count() {
            return Err(Error::RowCountMismatch {
                metadata_rows: self.row_count(),
                chart_rows: other.row_count(),
            });
        }
        let mut columns = self.columns.clone();
        columns.extend(other.columns.iter().cloned());

        let mut joined = Table::new(self.index_name.clone(), columns);
        for ((label, left), right) in self.index.iter().zip(&self.rows).zip(&other.rows) {
            let mut cells = left.clone();
            cells.extend(right.iter().cloned());
            joined.push_row(label.clone(), cells)?;
        }
        Ok(joined)
    }
}

// =============================================================================
// Unpivoted Records
// =============================================================================

/// One long-format row: a sample's identifying fields plus one size class
#[derive(Debug, Clone, PartialEq)]
pub struct UnpivotedRecord {
    /// Non-melted columns in table order
    pub fields: Vec<(String, Cell)>,
    /// Size class of the melted column; numeric bins serialise as numbers
    pub size_class: Cell,
    /// Former cell value
    pub value: Option<f64>,
}

impl UnpivotedRecord {
    /// Look up an identifying field by column name
    pub fn field(&self, name: &str) -> Option<&Cell> {
        self.fields
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, cell)| cell)
    }
}

impl Serialize for UnpivotedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use crate::constants::{SIZE_CLASS, VALUE};

        let mut map = serializer.serialize_map(Some(self.fields.len() + 2))?;
        for (column, cell) in &self.fields {
            map.serialize_entry(column, cell)?;
        }
        map.serialize_entry(SIZE_CLASS, &self.size_class)?;
        map.serialize_entry(VALUE, &self.value.filter(|v| v.is_finite()))?;
        map.end()
    }
}
