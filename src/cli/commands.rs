//! Command implementation for the particle size parser CLI
//!
//! Sets up logging, layers the configuration and turns the parse outcome
//! into a [`Response`].

use crate::app::services::psd_parser::{ParseResult, PsdParser};
use crate::app::services::response::{INVALID_ARGUMENTS, Response};
use crate::cli::args::Args;
use crate::config::ParserConfig;
use crate::{Error, Result};
use tracing::{debug, error, info};

/// Set up structured logging to stderr
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("psd_parser={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .map_err(|e| Error::configuration(format!("Failed to initialise logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Build the parser configuration: defaults, then file, then CLI overrides
pub fn load_configuration(args: &Args) -> Result<ParserConfig> {
    let mut config = ParserConfig::load_layered(args.config_file.as_deref())?;
    if args.all_sample_columns {
        config = config.with_all_sample_columns();
    }
    config.validate()?;
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Parse the file named on the command line
pub fn parse(args: &Args) -> Result<ParseResult> {
    let file = args.file.as_deref().ok_or(Error::MissingArgument)?;
    let config = load_configuration(args)?;
    let parser = PsdParser::new(config)?;

    let result = parser.parse_file(file)?;
    info!(
        "Successfully parsed file. Found {} data points.",
        result.records.len()
    );
    Ok(result)
}

/// Failure response for a command line clap rejected
pub fn argument_error_response(error: &clap::Error) -> Response {
    Response::failure(INVALID_ARGUMENTS, error.to_string().trim_end())
}

/// Run the parser and wrap the outcome in a response
pub fn run(args: &Args) -> Response {
    let result = parse(args);
    if let Err(e) = &result {
        error!("{}: {}", e.kind(), e);
    }
    Response::from_result(result)
}
