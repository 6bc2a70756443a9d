//! Wide to long reshaping
//!
//! The trailing columns of a table, one per size class, are melted into
//! `Size_class`/`Value` pairs; every other column is repeated on each
//! resulting record.

use tracing::debug;

use crate::app::models::{Cell, Table, UnpivotedRecord};
use crate::{Error, Result};

/// Melt the last `size_classes.len()` columns into one record per row and column
///
/// `size_classes[i]` becomes the `Size_class` of the i-th melted column.
/// Records are ordered column-major: every row for the first melted column,
/// then every row for the next.
pub fn unpivot(table: &Table, size_classes: &[Cell]) -> Result<Vec<UnpivotedRecord>> {
    debug!("Creating final unpivoted data table");
    let value_columns = size_classes.len();
    let total = table.column_count();
    if value_columns > total {
        return Err(Error::processing(format!(
            "cannot melt {} columns from a table with {}",
            value_columns, total
        )));
    }

    let split = total - value_columns;
    let id_columns = &table.columns()[..split];

    let mut records = Vec::with_capacity(table.row_count() * value_columns);
    for (offset, size_class) in size_classes.iter().enumerate() {
        for cells in table.rows() {
            let fields = id_columns
                .iter()
                .cloned()
                .zip(cells[..split].iter().cloned())
                .collect();
            records.push(UnpivotedRecord {
                fields,
                size_class: size_class.clone(),
                value: cells[split + offset].as_f64(),
            });
        }
    }

    debug!(
        "Unpivoted {} rows x {} columns into {} records",
        table.row_count(),
        value_columns,
        records.len()
    );
    Ok(records)
}
