//! Command-line argument definitions for the particle size parser
//!
//! This module defines the CLI interface using the clap derive API.

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the particle size export parser
///
/// Reads one analyser export and prints a JSON response on stdout. Logs go
/// to stderr so stdout carries nothing but the response.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "psd-parser",
    version,
    about = "Reshape a particle size analyser export into long-format JSON records",
    long_about = "Reads a tab-delimited, UTF-16 export written by a laser-diffraction particle size \
                  analyser, joins its metadata and measurement blocks and prints one JSON response \
                  holding a record per sample and size class."
)]
pub struct Args {
    /// Path to the analyser export file
    ///
    /// Optional at the argument level: a missing path is reported through
    /// the JSON response rather than as a usage error.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Configuration file path (JSON format)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        help = "Configuration file path (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Read every measurement column instead of stopping at the first blank line's position
    #[arg(
        long = "all-sample-columns",
        help = "Read every measurement sample column"
    )]
    pub all_sample_columns: bool,

    /// Pretty-print the JSON response
    #[arg(long = "pretty", help = "Pretty-print the JSON response")]
    pub pretty: bool,

    /// Exit with status 1 when the response reports a failure
    ///
    /// By default the exit status is always 0 and callers inspect the
    /// `success` field instead.
    #[arg(
        long = "exit-code",
        help = "Exit with status 1 when parsing fails"
    )]
    pub exit_code: bool,

    /// Enable verbose logging output
    ///
    /// Use multiple times for increased verbosity (-v, -vv, -vvv).
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress logging except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress logging except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    /// Get the appropriate log level based on verbosity settings
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}
