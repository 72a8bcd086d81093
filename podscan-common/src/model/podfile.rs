// podscan-common/src/model/podfile.rs
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::requirement::Requirement;
use crate::error::{PodscanError, Result};

pub const PODFILE_NAME: &str = "Podfile.json";

/// One `pod` line of a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodEntry {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub subspecs: Option<Vec<String>>,
}

impl PodEntry {
    pub fn to_requirement(&self) -> Requirement {
        let mut req = Requirement::parse(&self.name);
        if let Some(v) = &self.version {
            req = req.with_version(v.clone());
        }
        if let Some(subspecs) = &self.subspecs {
            req = req.with_subspecs(subspecs.iter().cloned());
        }
        req
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    #[serde(default)]
    pub pods: Vec<PodEntry>,
}

/// Pre-parsed manifest: targets and the pods each one declares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Podfile {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub targets: Vec<Target>,
}

impl Podfile {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(PodscanError::from)
    }

    /// Loads `Podfile.json` from a project directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(PODFILE_NAME);
        debug!("Looking for Podfile at {}", path.display());
        if !path.is_file() {
            return Err(PodscanError::NotFound(format!(
                "No Podfile exists at {}",
                dir.display()
            )));
        }
        let raw = fs::read_to_string(&path)?;
        Self::from_json(&raw)
    }

    pub fn add_target(&mut self, name: impl Into<String>, pods: Vec<PodEntry>) -> &mut Self {
        self.targets.push(Target {
            name: name.into(),
            pods,
        });
        self
    }

    /// Every target's pods flattened into one ordered list.
    pub fn requirements(&self) -> Vec<Requirement> {
        self.targets
            .iter()
            .flat_map(|t| t.pods.iter().map(PodEntry::to_requirement))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::requirement::SubspecSelection;

    #[test]
    fn flattens_targets_in_order() {
        let podfile = Podfile::from_json(
            r#"{
                "platform": "ios",
                "targets": [
                    { "name": "App", "pods": [
                        { "name": "SDWebImage/GIF", "version": "4.4.2" },
                        { "name": "Texture", "version": "2.7", "subspecs": ["Yoga", "IGListKit"] }
                    ]},
                    { "name": "AppTests", "pods": [ { "name": "OCMock", "version": "3.4" } ] }
                ]
            }"#,
        )
        .unwrap();

        let reqs = podfile.requirements();
        assert_eq!(reqs.len(), 3);
        assert_eq!(reqs[0].name, "SDWebImage");
        assert_eq!(reqs[0].subspecs, SubspecSelection::qualified(["GIF"]));
        assert_eq!(reqs[0].version.as_deref(), Some("4.4.2"));
        assert_eq!(
            reqs[1].subspecs,
            SubspecSelection::qualified(["IGListKit", "Yoga"])
        );
        assert_eq!(reqs[2].name, "OCMock");
        assert!(reqs[2].subspecs.is_unqualified());
    }

    #[test]
    fn missing_podfile_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Podfile::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, PodscanError::NotFound(ref msg) if msg.starts_with("No Podfile exists")));
    }

    #[test]
    fn loads_podfile_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(PODFILE_NAME),
            r#"{ "targets": [ { "name": "Test", "pods": [ { "name": "Masonry" } ] } ] }"#,
        )
        .unwrap();
        let podfile = Podfile::load_from_dir(dir.path()).unwrap();
        assert_eq!(podfile.requirements(), vec![Requirement::new("Masonry")]);
    }

    #[test]
    fn empty_targets_yield_no_requirements() {
        let mut podfile = Podfile::default();
        podfile.add_target("Empty", Vec::new());
        assert!(podfile.requirements().is_empty());
    }
}
