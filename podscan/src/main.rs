// podscan/src/main.rs
use std::process;

use clap::Parser;
use colored::Colorize;
use podscan_common::config::Config;
use podscan_common::error::{PodscanError, Result as PsResult};
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::CliArgs;

const LOG_ENV: &str = "PODSCAN_LOG";

fn init_logging(verbose: u8) {
    let level_filter = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .without_time()
        .try_init();
}

fn main() -> PsResult<()> {
    let cli_args = CliArgs::parse();
    init_logging(cli_args.verbose);

    let mut config = Config::load().map_err(|e| {
        PodscanError::Config(format!("Could not load config: {e}"))
    })?;
    if let Some(repo) = &cli_args.specs_repo {
        debug!("Specs repo overridden on the command line: {}", repo.display());
        config.specs_repo = repo.clone();
    }

    if let Err(e) = cli_args.command.run(&config) {
        error!("Command failed: {:#}", e);
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }

    debug!("Command completed successfully.");
    Ok(())
}
