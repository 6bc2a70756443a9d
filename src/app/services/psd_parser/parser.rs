//! Core particle size export parser
//!
//! This module runs the pipeline stages in order: blank-row scan, metadata
//! and measurement loading, chart assembly, label decomposition and the
//! final unpivot.

use std::path::Path;
use tracing::{debug, error, info, info_span, warn};

use super::chart::{SampleLabels, assemble_chart};
use super::label::LabelDecomposer;
use super::measurement::{coerce_leading_column, load_measurements};
use super::metadata::{coerce_numeric_attributes, drop_empty_samples, load_metadata};
use super::scanner::scan_blank_rows;
use super::source::ExportSource;
use super::stats::{ParseResult, ParseStats};
use super::unpivot::unpivot;
use crate::app::models::UnpivotedRecord;
use crate::config::{ParserConfig, SampleWindow};
use crate::constants::{LABEL_OU_SR, MRA_NO};
use crate::{Error, Result};

/// Parser for particle size distribution exports
#[derive(Debug, Clone)]
pub struct PsdParser {
    config: ParserConfig,
    labels: LabelDecomposer,
}

impl PsdParser {
    /// Create a parser with the given configuration
    pub fn new(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            labels: LabelDecomposer::new()?,
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse an export file into long-format records
    pub fn parse_file(&self, file_path: &Path) -> Result<ParseResult> {
        let span = info_span!("parse_file", path = %file_path.display());
        let _guard = span.enter();
        info!("Starting to parse file: {}", file_path.display());

        let source = ExportSource::open(file_path).inspect_err(|e| {
            error!("Parsing failed while reading file: {}", e);
        })?;
        self.parse_source(&source)
    }

    /// Parse already decoded export content
    pub fn parse_source(&self, source: &ExportSource) -> Result<ParseResult> {
        let mut stats = ParseStats::new();
        match self.run_pipeline(source, &mut stats) {
            Ok(records) => {
                info!(
                    "Parsing completed successfully: {} records, {} data points, {} skipped ({:.1}% used)",
                    records.len(),
                    stats.data_points,
                    stats.skipped_points.len(),
                    stats.success_rate()
                );
                Ok(ParseResult { records, stats })
            }
            Err(e) => {
                error!("Parsing failed ({}): {}", e.kind(), e);
                Err(e)
            }
        }
    }

    fn run_pipeline(
        &self,
        source: &ExportSource,
        stats: &mut ParseStats,
    ) -> Result<Vec<UnpivotedRecord>> {
        let config = &self.config;

        let blanks = scan_blank_rows(source, config, stats)?;
        debug!(
            "Number of rows between blank rows: {:?}",
            blanks.metadata_rows()
        );

        let mut metadata = load_metadata(source, &blanks, config, stats)?;
        let mut measurements = load_measurements(source, &blanks, config, stats)?;

        debug!("Processing table data");
        coerce_leading_column(&mut measurements, stats);

        let labels = SampleLabels::from_metadata(&metadata, &config.label_source_column)?;
        let column_window = match config.sample_window {
            SampleWindow::BlankLineBound => blanks.first,
            SampleWindow::AllColumns => usize::MAX,
        };
        let chart = assemble_chart(&measurements, &labels, column_window, config, stats)?;

        debug!("Processing metadata table");
        drop_empty_samples(&mut metadata, stats);
        coerce_numeric_attributes(
            &mut metadata,
            config.numeric_metadata_from,
            &[
                config.mra_source_column.as_str(),
                config.label_source_column.as_str(),
            ],
        )?;

        debug!("Combining data and chart tables");
        let mut combined = metadata.join_by_position(&chart.table)?;
        combined.rename_column(&config.mra_source_column, MRA_NO);
        combined.rename_column(&config.label_source_column, LABEL_OU_SR);

        self.labels.apply(&mut combined)?;

        let expected = config.max_measurement_rows + 1;
        if chart.size_classes.len() != expected {
            warn!(
                "Export has {} size-class columns instead of {}; melting only those",
                chart.size_classes.len(),
                expected
            );
        }
        let records = unpivot(&combined, &chart.size_classes)?;
        stats.records = records.len();
        if records.is_empty() {
            return Err(Error::NoRecords);
        }
        Ok(records)
    }
}
