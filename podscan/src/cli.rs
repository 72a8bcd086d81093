// podscan/src/cli.rs
//! Defines the command-line argument structure using clap.
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use podscan_common::error::Result;
use podscan_common::{Config, SubspecActivation};

// Module declarations
pub mod analyze;
pub mod info;

use crate::cli::analyze::Analyze;
use crate::cli::info::Info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "podscan", bin_name = "podscan")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Specs repository root (overrides PODSCAN_SPECS_REPO)
    #[arg(long, global = true, value_name = "DIR")]
    pub specs_repo: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Analyze(Analyze),
    Info(Info),
}

impl Command {
    pub fn run(&self, config: &Config) -> Result<()> {
        match self {
            Self::Analyze(command) => command.run(config),
            Self::Info(command) => command.run(config),
        }
    }
}

/// `--activation` values; mirrors `SubspecActivation`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationArg {
    Named,
    All,
}

impl From<ActivationArg> for SubspecActivation {
    fn from(arg: ActivationArg) -> Self {
        match arg {
            ActivationArg::Named => SubspecActivation::Named,
            ActivationArg::All => SubspecActivation::All,
        }
    }
}
