//! Success/error JSON envelope
//!
//! Every invocation produces exactly one [`Response`]. Callers tell success
//! from failure through the `success` field; the error kind is folded into
//! `details` so the external shape stays the same for every failure.

use serde::Serialize;
use tracing::debug;

use crate::app::models::UnpivotedRecord;
use crate::app::services::psd_parser::ParseResult;
use crate::{Error, Result};

/// Message used for every pipeline failure
pub const PARSING_FAILED: &str = "Parsing failed";

/// Message used when no input path was supplied
pub const NO_FILE_PATH: &str = "No file path provided";

/// Message used when the command line cannot be parsed
pub const INVALID_ARGUMENTS: &str = "Invalid command line arguments";

/// Error payload of a failed response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub details: String,
}

/// Discriminated response written to stdout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<UnpivotedRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    pub fn success(records: Vec<UnpivotedRecord>) -> Self {
        Self {
            success: true,
            data: Some(records),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                message: message.into(),
                details: details.into(),
            }),
        }
    }

    /// Failure response for a pipeline or argument error
    pub fn from_error(error: &Error) -> Self {
        match error {
            Error::MissingArgument => Self::failure(NO_FILE_PATH, error.to_string()),
            _ => Self::failure(PARSING_FAILED, format!("{}: {}", error.kind(), error)),
        }
    }

    /// Response for a parse outcome; an empty record set counts as a failure
    pub fn from_result(result: Result<ParseResult>) -> Self {
        match result {
            Ok(parsed) if parsed.records.is_empty() => Self::from_error(&Error::NoRecords),
            Ok(parsed) => Self::success(parsed.records),
            Err(e) => Self::from_error(&e),
        }
    }

    /// Serialise to JSON, optionally pretty-printed
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
        .map_err(|e| Error::processing(format!("Failed to serialise response: {}", e)))?;
        debug!("Serialised response: {} bytes", json.len());
        Ok(json)
    }
}
