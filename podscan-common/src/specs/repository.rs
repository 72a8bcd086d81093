// podscan-common/src/specs/repository.rs
// Spec source reading a CocoaPods Specs checkout:
//   <root>/<Name>/<version>/<Name>.podspec.json
// or the sharded trunk layout:
//   <root>/<h0>/<h1>/<h2>/<Name>/<version>/<Name>.podspec.json

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use md5::{Digest, Md5};
use semver::Version;
use tracing::{debug, warn};

use super::version::{constraint_for, parse_version};
use super::SpecSource;
use crate::config::Config;
use crate::error::{PodscanError, Result};
use crate::model::PodSpec;

pub const PODSPEC_JSON_EXT: &str = "podspec.json";

// Hex digits of the name's MD5 used as nested shard directories by trunk.
const SHARD_DEPTH: usize = 3;

/// Shard directories (`a/a/4` for `Masonry`) trunk places a pod under.
pub fn shard_prefix(name: &str) -> PathBuf {
    let digest = format!("{:x}", Md5::digest(name.as_bytes()));
    digest.chars().take(SHARD_DEPTH).map(String::from).collect()
}

pub struct SpecRepository {
    root: PathBuf,
    parsed_cache: Mutex<HashMap<(String, String), Arc<PodSpec>>>,
}

impl SpecRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            parsed_cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.specs_repo())
    }

    /// `<root>/<Name>` when present, otherwise the sharded trunk location.
    pub fn pod_dir(&self, name: &str) -> PathBuf {
        let flat = self.root.join(name);
        if flat.is_dir() {
            return flat;
        }
        self.root.join(shard_prefix(name)).join(name)
    }

    pub fn podspec_path(&self, name: &str, version_dir: &str) -> PathBuf {
        self.pod_dir(name)
            .join(version_dir)
            .join(format!("{name}.{PODSPEC_JSON_EXT}"))
    }

    /// Version directories of a pod with their parsed versions. Entries that
    /// do not parse as versions are skipped.
    pub fn available_versions(&self, name: &str) -> Result<Vec<(Version, String)>> {
        let pod_dir = self.pod_dir(name);
        if !pod_dir.is_dir() {
            debug!(
                "Pod directory '{}' not found for '{}'",
                pod_dir.display(),
                name
            );
            return Ok(Vec::new());
        }

        let mut versions = Vec::new();
        for entry in fs::read_dir(&pod_dir)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let Some(dir_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            match parse_version(dir_name) {
                Ok(v) => versions.push((v, dir_name.to_string())),
                Err(e) => warn!(
                    "Skipping version directory '{}' of '{}': {}",
                    path.display(),
                    name,
                    e
                ),
            }
        }
        versions.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(versions)
    }

    fn load(&self, name: &str, version_dir: &str) -> Result<Arc<PodSpec>> {
        let key = (name.to_string(), version_dir.to_string());
        {
            let cache = self.parsed_cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(spec) = cache.get(&key) {
                debug!("Loaded podspec '{}' {} from parsed cache.", name, version_dir);
                return Ok(Arc::clone(spec));
            }
        }

        let path = self.podspec_path(name, version_dir);
        debug!("Reading podspec from {}", path.display());
        let raw = fs::read_to_string(&path)?;
        let spec = Arc::new(PodSpec::from_json(&raw)?);
        if spec.name != name {
            warn!(
                "Podspec at {} declares name '{}', expected '{}'",
                path.display(),
                spec.name,
                name
            );
        }

        self.parsed_cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(key)
            .or_insert_with(|| Arc::clone(&spec));
        Ok(spec)
    }

    pub fn clear_cache(&self) {
        self.parsed_cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl SpecSource for SpecRepository {
    fn find(&self, name: &str, version: Option<&str>) -> Result<Arc<PodSpec>> {
        let constraint = constraint_for(version)?;
        let selected = self
            .available_versions(name)?
            .into_iter()
            .rev()
            .find(|(v, _)| constraint.matches(v));

        match selected {
            Some((v, dir)) => {
                debug!("Selected '{}' {} for constraint {}", name, v, constraint);
                self.load(name, &dir)
            }
            None => {
                debug!(
                    "No version of '{}' in {} satisfies {}",
                    name,
                    self.root.display(),
                    constraint
                );
                Err(PodscanError::SpecNotFound {
                    name: name.to_string(),
                    version: version.map(str::to_string),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn write_spec(root: &Path, name: &str, version: &str, body: &str) {
        write_spec_in(&root.join(name), name, version, body);
    }

    fn write_spec_in(pod_dir: &Path, name: &str, version: &str, body: &str) {
        let dir = pod_dir.join(version);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{name}.{PODSPEC_JSON_EXT}")), body).unwrap();
    }

    #[test]
    fn selects_highest_matching_version() {
        let tmp = tempfile::tempdir().unwrap();
        for version in ["4.2", "4.4.2", "5.0.0"] {
            write_spec(
                tmp.path(),
                "SDWebImage",
                version,
                &format!(r#"{{ "name": "SDWebImage", "version": "{version}" }}"#),
            );
        }
        fs::create_dir_all(tmp.path().join("SDWebImage").join("not-a-version")).unwrap();

        let repo = SpecRepository::new(tmp.path());
        assert_eq!(repo.available_versions("SDWebImage").unwrap().len(), 3);
        assert_eq!(repo.find("SDWebImage", None).unwrap().version, "5.0.0");
        assert_eq!(
            repo.find("SDWebImage", Some("~> 4.2")).unwrap().version,
            "4.4.2"
        );
    }

    #[test]
    fn missing_pod_is_spec_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = SpecRepository::new(tmp.path());
        assert!(matches!(
            repo.find("Masonry", Some("1.0")),
            Err(PodscanError::SpecNotFound { .. })
        ));
    }

    #[test]
    fn malformed_podspec_is_json_error() {
        let tmp = tempfile::tempdir().unwrap();
        write_spec(tmp.path(), "Broken", "1.0", "{ not json");
        let repo = SpecRepository::new(tmp.path());
        assert!(matches!(
            repo.find("Broken", None),
            Err(PodscanError::Json(_))
        ));
    }

    #[test]
    fn parsed_specs_are_cached() {
        let tmp = tempfile::tempdir().unwrap();
        write_spec(
            tmp.path(),
            "Masonry",
            "1.0",
            r#"{ "name": "Masonry", "version": "1.0" }"#,
        );
        let repo = SpecRepository::new(tmp.path());
        let first = repo.find("Masonry", None).unwrap();

        // Served from the cache even after the file changes on disk.
        write_spec(tmp.path(), "Masonry", "1.0", "{ not json");
        let second = repo.find("Masonry", None).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        repo.clear_cache();
        assert!(repo.find("Masonry", None).is_err());
    }

    #[test]
    fn shard_prefix_uses_md5_of_name() {
        assert_eq!(shard_prefix("Masonry"), Path::new("a/a/4"));
        assert_eq!(shard_prefix("AFNetworking"), Path::new("a/7/5"));
    }

    #[test]
    fn reads_sharded_trunk_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let pod_dir = tmp.path().join("a").join("a").join("4").join("Masonry");
        for version in ["1.0.0", "1.1.0"] {
            write_spec_in(
                &pod_dir,
                "Masonry",
                version,
                &format!(r#"{{ "name": "Masonry", "version": "{version}" }}"#),
            );
        }

        let repo = SpecRepository::new(tmp.path());
        assert_eq!(repo.pod_dir("Masonry"), pod_dir);
        assert_eq!(repo.find("Masonry", None).unwrap().version, "1.1.0");
        assert_eq!(repo.find("Masonry", Some("1.0")).unwrap().version, "1.0.0");
    }

    #[test]
    fn flat_layout_wins_over_shards() {
        let tmp = tempfile::tempdir().unwrap();
        write_spec(
            tmp.path(),
            "Masonry",
            "1.0",
            r#"{ "name": "Masonry", "version": "1.0" }"#,
        );
        let repo = SpecRepository::new(tmp.path());
        assert_eq!(repo.pod_dir("Masonry"), tmp.path().join("Masonry"));
    }
}
