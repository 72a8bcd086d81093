// podscan/src/cli/analyze.rs
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use colored::Colorize;
use podscan_common::config::Config;
use podscan_common::error::Result;
use podscan_common::{DependencyAnalyzer, DependencyMap, SpecRepository};
use tracing::instrument;

use super::ActivationArg;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Args)]
pub struct Analyze {
    /// Project directory containing Podfile.json
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// What a dependency on another pod's subspec activates in that pod
    #[arg(long, value_enum)]
    pub activation: Option<ActivationArg>,
}

impl Analyze {
    #[instrument(skip(self, config), fields(dir = %self.dir.display()))]
    pub fn run(&self, config: &Config) -> Result<()> {
        let repo = SpecRepository::from_config(config);
        let activation = self
            .activation
            .map_or(config.subspec_activation, Into::into);

        let map = DependencyAnalyzer::new(&repo)
            .with_subspec_activation(activation)
            .analyze(&self.dir)?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&map)?),
            OutputFormat::Text => print_text(&map),
        }
        Ok(())
    }
}

fn print_text(map: &DependencyMap) {
    for (name, deps) in map {
        if deps.is_empty() {
            println!("{}", name.bold());
        } else {
            println!("{} {} {}", name.bold(), "->".blue(), deps.join(", "));
        }
    }
    println!("{}", format!("{} pods", map.len()).bold());
}
