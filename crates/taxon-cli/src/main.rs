//! Taxon CLI - Creative Tech Taxonomy tooling
//!
//! Main entry point for the `taxon` binary.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use taxon_common_config::Environment;
use taxon_common_log::LogConfig;

mod cli;
mod commands;
mod error;
mod output;

use cli::Cli;
use error::CliError;

/// Application exit codes
#[repr(u8)]
pub enum Exit {
    Success = 0,
    GeneralError = 1,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // `.env` may carry log settings as well as the API key
    if let Err(e) = Environment::init() {
        eprintln!("warning: {e}");
    }
    if let Err(e) = init_logging(&cli) {
        report(&e);
        return e.exit_code();
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {e}");
            return Exit::GeneralError.into();
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => Exit::Success.into(),
        Err(e) => {
            report(&e);
            e.exit_code()
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = cli.load_config()?;
    debug!(root = %ctx.root.display(), "Configuration loaded");

    cli.execute(ctx).await
}

fn init_logging(cli: &Cli) -> Result<(), CliError> {
    let mut config = LogConfig::from_env();
    if let Some(level) = cli.log_level() {
        config = config.with_level(level);
    } else if !log_level_from_env() {
        config = config.with_level(taxon_common_log::LogLevel::Warn);
    }
    taxon_common_log::init(config)?;
    Ok(())
}

fn log_level_from_env() -> bool {
    use taxon_common_log::vars;
    [vars::LEVEL, vars::RUST_LOG]
        .iter()
        .any(|var| Environment::get(var).is_some())
}

fn report(e: &CliError) {
    eprintln!("Error [{}]: {e}", e.code());
    if let Some(hint) = e.hint() {
        eprintln!("  hint: {hint}");
    }
}
