//! Application constants for the particle size parser
//!
//! This module contains the fixed format markers, column names and patterns
//! used throughout the parsing pipeline.

// =============================================================================
// Export File Format
// =============================================================================

/// Field delimiter used throughout the analyser export
pub const FIELD_DELIMITER: u8 = b'\t';

/// Quote character used when scanning for blank-row markers
pub const SCAN_QUOTE: u8 = b'|';

/// Quote character used in the metadata and measurement blocks
pub const TABLE_QUOTE: u8 = b'"';

/// Number of blank-row markers that partition a well-formed export
pub const REQUIRED_BLANK_ROWS: usize = 2;

/// Lines between the second blank row and the measurement header
pub const MEASUREMENT_HEADER_OFFSET: usize = 2;

/// Maximum number of size-class rows read from the measurement block
pub const MAX_MEASUREMENT_ROWS: usize = 100;

// =============================================================================
// Column Names
// =============================================================================

/// Metadata attribute holding the MRA number
pub const COMMENT_1: &str = "Comment 1";

/// Metadata attribute holding the composite sample label
pub const COMMENT_2: &str = "Comment 2";

/// Output name for `Comment 1`
pub const MRA_NO: &str = "MRA_no";

/// Output name for `Comment 2`
pub const LABEL_OU_SR: &str = "Label_OU_SR";

pub const METHOD_SHORT: &str = "Method_short";
pub const TRIAL: &str = "Trial";
pub const INTERMEDIATE_FORM: &str = "Intermediate_Form";
pub const BATCH: &str = "Batch";

/// Melted column holding the former size-class column name
pub const SIZE_CLASS: &str = "Size_class";

/// Melted column holding the former cell value
pub const VALUE: &str = "Value";

/// Reference column prepended to every chart row
pub const REFERENCE_COLUMN: &str = "0.1";

/// Value of the reference column
pub const REFERENCE_VALUE: f64 = 0.0;

/// Metadata attributes at or after this position hold numeric values
pub const NUMERIC_METADATA_FROM: usize = 2;

// =============================================================================
// Label Patterns
// =============================================================================

/// Leading method code: `M`, one digit, optional separator
pub const METHOD_SHORT_PATTERN: &str = r"^(M[0-9][;,:]?)(.*)";

/// Separators stripped from the end of a method code
pub const METHOD_SEPARATORS: &[char] = &[';', ',', ':'];

/// First comma/space delimited token, then the remainder
pub const TRIAL_PATTERN: &str = r"([^, ]+)[, ]?(.*)";

/// Batch identifier embedded in a trial, e.g. `ABC12-3D45`
pub const BATCH_PATTERN: &str = r"(?i)([A-Z]{3}\d{2}-\d[A-Z]\d{0,2})";

// =============================================================================
// Configuration
// =============================================================================

/// Directory name used under the platform config directory
pub const CONFIG_DIR_NAME: &str = "psd-parser";

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "config.json";
