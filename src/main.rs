//! meshglb: one-shot OBJ/PLY/USD to GLB converter.
//!
//! Wires configuration, logging and the native scene host into the
//! conversion pipeline and turns its outcome into a process exit code.

use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;
use tracing_subscriber::{EnvFilter, fmt};

use meshglb_core::config::AppConfig;
use meshglb_core::error::AppError;
use meshglb_host::NativeHost;
use plugin_glb_converter::{ConversionError, ConversionProcessor, ExitOutcome};

mod cli;
mod output;

use cli::Cli;
use output::ConsoleReporter;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                let _ = e.print();
                return ExitCode::SUCCESS;
            }
            _ => {
                eprintln!("{e}");
                return exit_with(ConversionError::MissingArgs);
            }
        },
    };

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            output::print_error(&format!("Configuration error: {}", e.message));
            return ExitCode::from(1);
        }
    };

    init_logging(&config);

    let request = match cli.request() {
        Ok(r) => r,
        Err(e) => return exit_with(e),
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        input = %request.input_path.display(),
        output = %request.output_path.display(),
        "Starting conversion"
    );

    let mut host = NativeHost::from_config(&config.host);
    let mut reporter = ConsoleReporter;
    let processor = ConversionProcessor::new(config.conversion.clone());

    match processor.run(&mut host, &request, &mut reporter) {
        Ok(_) => {
            output::print_ok(&ExitOutcome::success(&request.output_path).message);
            ExitCode::SUCCESS
        }
        Err(e) => exit_with(e),
    }
}

/// Load the config file and apply command-line overrides.
fn load_configuration(cli: &Cli) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.override_log_level(level)?;
    }
    Ok(config)
}

/// Initialize tracing on stderr. `RUST_LOG` wins over the configured level.
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Print the failure and map it to its exit code. Host failures also get
/// their full cause chain on stderr.
fn exit_with(err: ConversionError) -> ExitCode {
    let outcome = ExitOutcome::from(&err);
    output::print_error(&outcome.message);
    tracing::error!(code = outcome.code, error = %err, "Conversion failed");
    if err.has_host_cause() {
        output::print_cause_chain(&anyhow::Error::new(err));
    }
    ExitCode::from(outcome.code as u8)
}
