//! Sample label decomposition
//!
//! The `Label_OU_SR` text packs a method code, trial, intermediate form and
//! batch into one free-text field. The extractors below peel them off in
//! sequence, each working on the previous one's remainder.

use regex::Regex;
use tracing::debug;

use crate::app::models::{Cell, Table};
use crate::constants::{
    BATCH, BATCH_PATTERN, INTERMEDIATE_FORM, LABEL_OU_SR, METHOD_SEPARATORS, METHOD_SHORT,
    METHOD_SHORT_PATTERN, TRIAL, TRIAL_PATTERN,
};
use crate::{Error, Result};

/// Parts of a decomposed label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecomposedLabel {
    pub method_short: Option<String>,
    /// Label text left after removing the method code
    pub residual: String,
    pub trial: String,
    pub intermediate_form: String,
    pub batch: String,
}

/// Compiled label patterns
#[derive(Debug, Clone)]
pub struct LabelDecomposer {
    method_short: Regex,
    trial: Regex,
    batch: Regex,
}

impl LabelDecomposer {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                Error::processing(format!("invalid label pattern '{}': {}", pattern, e))
            })
        };
        Ok(Self {
            method_short: compile(METHOD_SHORT_PATTERN)?,
            trial: compile(TRIAL_PATTERN)?,
            batch: compile(BATCH_PATTERN)?,
        })
    }

    /// Split a leading `M<digit>` method code from the label
    ///
    /// Returns the code without its separator and the trimmed remainder, or
    /// `None` and the untouched label when there is no code.
    pub fn extract_method_short(&self, label: &str) -> (Option<String>, String) {
        match self.method_short.captures(label) {
            Some(caps) => {
                let method = caps[1].trim_end_matches(METHOD_SEPARATORS).to_string();
                (Some(method), caps[2].trim().to_string())
            }
            None => (None, label.to_string()),
        }
    }

    /// Split the first comma/space delimited token (trial) from the rest (intermediate form)
    pub fn extract_trial(&self, text: &str) -> (String, String) {
        match self.trial.captures(text) {
            Some(caps) => (caps[1].to_string(), caps[2].trim().to_string()),
            None => (text.to_string(), String::new()),
        }
    }

    /// Batch identifier embedded in a trial, or the trial itself
    pub fn extract_trial_without_letter(&self, trial: &str) -> String {
        self.batch
            .captures(trial)
            .map(|caps| caps[1].to_string())
            .unwrap_or_else(|| trial.to_string())
    }

    /// Run all three extractors in sequence
    pub fn decompose(&self, label: &str) -> DecomposedLabel {
        let (method_short, residual) = self.extract_method_short(label);
        let (trial, intermediate_form) = self.extract_trial(&residual);
        let batch = self.extract_trial_without_letter(&trial);
        DecomposedLabel {
            method_short,
            residual,
            trial,
            intermediate_form,
            batch,
        }
    }

    /// Decompose every row's `Label_OU_SR` and insert the parts as leading columns
    ///
    /// `Label_OU_SR` itself is replaced by the residual after the method code.
    pub fn apply(&self, table: &mut Table) -> Result<()> {
        debug!("Extracting and formatting label information");
        let col = table
            .column_position(LABEL_OU_SR)
            .ok_or_else(|| Error::missing_column("combined", LABEL_OU_SR))?;

        let mut method_short = Vec::with_capacity(table.row_count());
        let mut trial = Vec::with_capacity(table.row_count());
        let mut intermediate_form = Vec::with_capacity(table.row_count());
        let mut batch = Vec::with_capacity(table.row_count());

        for row in 0..table.row_count() {
            let label = table.cell(row, col).map(Cell::to_string).unwrap_or_default();
            let parts = self.decompose(&label);

            if let Some(cell) = table.cell_mut(row, col) {
                *cell = Cell::Text(parts.residual);
            }
            method_short.push(parts.method_short.map_or(Cell::Empty, Cell::Text));
            trial.push(Cell::Text(parts.trial));
            intermediate_form.push(Cell::Text(parts.intermediate_form));
            batch.push(Cell::Text(parts.batch));
        }

        table.insert_column(0, METHOD_SHORT, method_short)?;
        table.insert_column(1, TRIAL, trial)?;
        table.insert_column(2, INTERMEDIATE_FORM, intermediate_form)?;
        table.insert_column(3, BATCH, batch)?;
        Ok(())
    }
}
