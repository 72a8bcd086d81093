// podscan/src/cli/info.rs
use clap::Args;
use colored::Colorize;
use podscan_common::config::Config;
use podscan_common::error::Result;
use podscan_common::model::SubSpec;
use podscan_common::{SpecRepository, SpecSource};

#[derive(Args, Debug)]
pub struct Info {
    pub name: String,

    /// Version constraint, e.g. "~> 4.4"
    #[arg(long, short = 'c', value_name = "CONSTRAINT")]
    pub constraint: Option<String>,
}

impl Info {
    pub fn run(&self, config: &Config) -> Result<()> {
        tracing::debug!("Looking up podspec for: {}", self.name);
        let repo = SpecRepository::from_config(config);
        let spec = repo.find(&self.name, self.constraint.as_deref())?;

        println!("{} {}", spec.name.bold().green(), spec.version);
        if let Some(summary) = &spec.summary {
            println!("{summary}");
        }
        if let Some(homepage) = &spec.homepage {
            println!("{}", homepage.blue());
        }

        println!("{}", "==> Dependencies".bold().blue());
        if spec.dependencies.is_empty() {
            println!("  (none)");
        }
        for (name, constraints) in &spec.dependencies {
            println!("  {} {}", name, constraints.join(", ").dimmed());
        }

        if spec.has_subspecs() {
            println!("{}", "==> Subspecs".bold().blue());
            print_subspecs(&spec.subspecs, 1);
        }
        Ok(())
    }
}

fn print_subspecs(subspecs: &[SubSpec], depth: usize) {
    let indent = "  ".repeat(depth);
    for sub in subspecs {
        let deps: Vec<&str> = sub.dependencies.keys().map(String::as_str).collect();
        if deps.is_empty() {
            println!("{indent}{}", sub.name.bold());
        } else {
            println!("{indent}{} {} {}", sub.name.bold(), "->".blue(), deps.join(", "));
        }
        print_subspecs(&sub.subspecs, depth + 1);
    }
}
