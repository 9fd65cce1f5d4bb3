use std::process::ExitCode;

use clap::Parser;
use metablock::cli::{run_cli, Cli};
use metablock::generator::Outcome;
use metablock::logging::{init_logging_with_config, LogConfig};
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging_with_config(&LogConfig::from_env()) {
        eprintln!("Warning: {e:#}");
    }

    match run_cli(&cli) {
        Ok(Outcome::Skipped(reason)) => {
            eprintln!("{reason}");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Written { .. } | Outcome::Printed) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "generation failed");
            eprintln!("❌ {err:#}");
            ExitCode::FAILURE
        }
    }
}
