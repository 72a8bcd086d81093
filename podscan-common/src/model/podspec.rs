// podscan-common/src/model/podspec.rs
// Podspec model, deserialized from the `.podspec.json` files found in a
// CocoaPods Specs repository.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::requirement::{Requirement, SUBSPEC_SEPARATOR};
use crate::error::{PodscanError, Result};

/// Dependency declarations as they appear in a podspec: qualified name to
/// the list of constraint strings (usually zero or one).
pub type DependencyDecls = BTreeMap<String, Vec<String>>;

/// A named subset of a pod. Shares the parent's version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubSpec {
    pub name: String,
    #[serde(default)]
    pub dependencies: DependencyDecls,
    #[serde(default)]
    pub subspecs: Vec<SubSpec>,
}

impl SubSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: DependencyDecls::new(),
            subspecs: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.dependencies.insert(name.into(), Vec::new());
        self
    }

    pub fn with_subspec(mut self, subspec: SubSpec) -> Self {
        self.subspecs.push(subspec);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodSpec {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub dependencies: DependencyDecls,
    #[serde(default)]
    pub subspecs: Vec<SubSpec>,
}

impl PodSpec {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            summary: None,
            homepage: None,
            dependencies: DependencyDecls::new(),
            subspecs: Vec::new(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(PodscanError::from)
    }

    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.dependencies.insert(name.into(), Vec::new());
        self
    }

    pub fn with_subspec(mut self, subspec: SubSpec) -> Self {
        self.subspecs.push(subspec);
        self
    }

    /// Top-level dependencies as requirements.
    pub fn dependency_requirements(&self) -> Vec<Requirement> {
        to_requirements(&self.dependencies)
    }

    /// Finds a subspec by its path relative to this pod (`GIF`, `Core/Cache`).
    pub fn subspec(&self, path: &str) -> Option<&SubSpec> {
        let mut segments = path.split(SUBSPEC_SEPARATOR);
        let first = segments.next()?;
        let mut current = self.subspecs.iter().find(|s| s.name == first)?;
        for segment in segments {
            current = current.subspecs.iter().find(|s| s.name == segment)?;
        }
        Some(current)
    }

    /// Like `subspec`, but fails with `SubspecNotFound`.
    pub fn require_subspec(&self, path: &str) -> Result<&SubSpec> {
        self.subspec(path)
            .ok_or_else(|| PodscanError::SubspecNotFound {
                pod: self.name.clone(),
                subspec: path.to_string(),
            })
    }

    /// Every subspec path, depth first, parents before children.
    pub fn all_subspec_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_paths(&self.subspecs, None, &mut out);
        out
    }

    /// Paths of the subspecs nested under `path` (not including `path`).
    pub fn nested_subspec_paths(&self, path: &str) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(sub) = self.subspec(path) {
            collect_paths(&sub.subspecs, Some(path), &mut out);
        }
        out
    }

    pub fn has_subspecs(&self) -> bool {
        !self.subspecs.is_empty()
    }
}

fn collect_paths(subspecs: &[SubSpec], prefix: Option<&str>, out: &mut Vec<String>) {
    for sub in subspecs {
        let path = match prefix {
            Some(p) => format!("{p}{SUBSPEC_SEPARATOR}{}", sub.name),
            None => sub.name.clone(),
        };
        out.push(path.clone());
        collect_paths(&sub.subspecs, Some(&path), out);
    }
}

/// Converts podspec dependency declarations into requirements. Only the
/// first constraint of a declaration is kept.
pub fn to_requirements(decls: &DependencyDecls) -> Vec<Requirement> {
    decls
        .iter()
        .map(|(name, constraints)| {
            let req = Requirement::parse(name);
            match constraints.first() {
                Some(v) => req.with_version(v.clone()),
                None => req,
            }
        })
        .collect()
}

/// Parent chain of a subspec path: `A/B/C` yields `A`, `A/B`.
pub fn parent_paths(path: &str) -> Vec<String> {
    path.match_indices(SUBSPEC_SEPARATOR)
        .map(|(idx, _)| path[..idx].to_string())
        .collect()
}
