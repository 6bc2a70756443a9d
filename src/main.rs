use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use psd_parser::Response;
use psd_parser::cli::{args::Args, commands};
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::process;
use std::sync::Mutex;

/// Report of the last panic, filled in by the panic hook
static PANIC_REPORT: Mutex<Option<String>> = Mutex::new(None);

fn main() -> anyhow::Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => return emit(&commands::argument_error_response(&e), false),
    };

    if let Err(e) = commands::setup_logging(&args) {
        eprintln!("Warning: {}", e);
    }

    let response = run_guarded(&args);
    emit(&response, args.pretty)?;

    if args.exit_code && !response.success {
        process::exit(1);
    }
    Ok(())
}

/// Write the response as a single JSON object on stdout
fn emit(response: &Response, pretty: bool) -> anyhow::Result<()> {
    let json = response
        .to_json(pretty)
        .context("Failed to serialise response")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json).context("Failed to write response")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}

/// Run the parser, turning a panic into a failure response
fn run_guarded(args: &Args) -> Response {
    panic::set_hook(Box::new(|info| {
        tracing::error!("Unhandled panic: {}", info);
        if let Ok(mut report) = PANIC_REPORT.lock() {
            *report = Some(info.to_string());
        }
    }));

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| commands::run(args)));
    let _ = panic::take_hook();

    match outcome {
        Ok(response) => response,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "Unknown panic".to_string());
            let details = PANIC_REPORT
                .lock()
                .ok()
                .and_then(|mut report| report.take())
                .unwrap_or_default();
            Response::failure(message, details)
        }
    }
}
