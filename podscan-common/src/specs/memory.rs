// podscan-common/src/specs/memory.rs
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::version::{constraint_for, parse_version};
use super::SpecSource;
use crate::error::{PodscanError, Result};
use crate::model::PodSpec;

/// Spec source backed by specs registered in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemorySpecSource {
    specs: HashMap<String, Vec<Arc<PodSpec>>>,
}

impl InMemorySpecSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, spec: PodSpec) {
        self.specs
            .entry(spec.name.clone())
            .or_default()
            .push(Arc::new(spec));
    }

    pub fn with_spec(mut self, spec: PodSpec) -> Self {
        self.insert(spec);
        self
    }

    /// Builds a source from a JSON array of podspecs.
    pub fn from_json(raw: &str) -> Result<Self> {
        let specs: Vec<PodSpec> = serde_json::from_str(raw)?;
        debug!("Parsed {} podspecs.", specs.len());
        Ok(specs.into_iter().fold(Self::new(), Self::with_spec))
    }

    pub fn len(&self) -> usize {
        self.specs.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl SpecSource for InMemorySpecSource {
    fn find(&self, name: &str, version: Option<&str>) -> Result<Arc<PodSpec>> {
        let not_found = || PodscanError::SpecNotFound {
            name: name.to_string(),
            version: version.map(str::to_string),
        };
        let constraint = constraint_for(version)?;
        let candidates = self.specs.get(name).ok_or_else(not_found)?;

        let mut best = None;
        for spec in candidates {
            let parsed = match parse_version(&spec.version) {
                Ok(v) => v,
                Err(e) => {
                    warn!("Skipping '{}' {}: {}", name, spec.version, e);
                    continue;
                }
            };
            if !constraint.matches(&parsed) {
                continue;
            }
            let is_newer = best
                .as_ref()
                .map_or(true, |(best_version, _)| &parsed > best_version);
            if is_newer {
                best = Some((parsed, spec));
            }
        }

        best.map(|(_, spec)| Arc::clone(spec)).ok_or_else(not_found)
    }
}
