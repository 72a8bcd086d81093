// podscan-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};

use directories::UserDirs;
use tracing::debug;

use super::error::{PodscanError, Result};
use crate::dependency::SubspecActivation;

pub const SPECS_REPO_ENV: &str = "PODSCAN_SPECS_REPO";
pub const SUBSPEC_ACTIVATION_ENV: &str = "PODSCAN_SUBSPEC_ACTIVATION";

// Relative to the home directory; where `pod repo` keeps the trunk checkout.
const DEFAULT_SPECS_REPO: &str = ".cocoapods/repos/trunk/Specs";

#[derive(Debug, Clone)]
pub struct Config {
    pub specs_repo: PathBuf,
    pub subspec_activation: SubspecActivation,
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading podscan configuration");

        let specs_repo = env::var(SPECS_REPO_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let fallback = home_dir().join(DEFAULT_SPECS_REPO);
                debug!(
                    "{} not set or empty, falling back to default: {}",
                    SPECS_REPO_ENV,
                    fallback.display()
                );
                fallback
            });
        debug!("Effective specs repo set to: {}", specs_repo.display());

        let subspec_activation = match env::var(SUBSPEC_ACTIVATION_ENV) {
            Ok(raw) if !raw.is_empty() => raw.parse().map_err(|e: PodscanError| {
                PodscanError::Config(format!("{SUBSPEC_ACTIVATION_ENV}: {e}"))
            })?,
            _ => SubspecActivation::default(),
        };

        debug!("Configuration loaded successfully.");
        Ok(Self {
            specs_repo,
            subspec_activation,
        })
    }

    pub fn specs_repo(&self) -> &Path {
        &self.specs_repo
    }
}

fn home_dir() -> PathBuf {
    UserDirs::new().map_or_else(|| PathBuf::from("/"), |ud| ud.home_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_environment_overrides() {
        env::set_var(SPECS_REPO_ENV, "/tmp/podscan-specs");
        env::set_var(SUBSPEC_ACTIVATION_ENV, "all");
        let config = Config::load().unwrap();
        assert_eq!(config.specs_repo(), Path::new("/tmp/podscan-specs"));
        assert_eq!(config.subspec_activation, SubspecActivation::All);

        env::set_var(SUBSPEC_ACTIVATION_ENV, "sometimes");
        assert!(matches!(Config::load(), Err(PodscanError::Config(_))));

        env::remove_var(SPECS_REPO_ENV);
        env::remove_var(SUBSPEC_ACTIVATION_ENV);
        let config = Config::load().unwrap();
        assert!(config.specs_repo().ends_with(DEFAULT_SPECS_REPO));
        assert_eq!(config.subspec_activation, SubspecActivation::Named);
    }
}
