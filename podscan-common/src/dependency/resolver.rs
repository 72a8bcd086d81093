// podscan-common/src/dependency/resolver.rs

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, error};

use crate::error::{PodscanError, Result};
use crate::model::podspec::{parent_paths, to_requirements};
use crate::model::{PodSpec, Requirement, SubspecSelection};
use crate::specs::SpecSource;

/// Flat result: pod name to its sorted, deduplicated direct dependency names.
pub type DependencyMap = BTreeMap<String, Vec<String>>;

// --- SubspecActivation ---
/// What a dependency on another pod's subspec (`PINRemoteImage/PINCache`)
/// activates in that pod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubspecActivation {
    /// Only the named subspec (with its parents and nested subspecs).
    #[default]
    Named,
    /// Every subspec of the pod, as if it were required unqualified.
    All,
}

impl FromStr for SubspecActivation {
    type Err = PodscanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "named" => Ok(Self::Named),
            "all" => Ok(Self::All),
            other => Err(PodscanError::ParseError(
                "subspec activation",
                format!("expected 'named' or 'all', got '{other}'"),
            )),
        }
    }
}

impl fmt::Display for SubspecActivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named => f.write_str("named"),
            Self::All => f.write_str("all"),
        }
    }
}

// --- ResolutionContext ---
pub struct ResolutionContext<'a> {
    pub spec_source: &'a dyn SpecSource,
    pub subspec_activation: SubspecActivation,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(spec_source: &'a dyn SpecSource) -> Self {
        Self {
            spec_source,
            subspec_activation: SubspecActivation::default(),
        }
    }

    pub fn with_subspec_activation(mut self, activation: SubspecActivation) -> Self {
        self.subspec_activation = activation;
        self
    }
}

// --- ResolutionState ---
// Lives for exactly one `resolve` call.
#[derive(Default)]
struct ResolutionState {
    /// Computed entries; present once a pod's own dependencies are folded in.
    entries: BTreeMap<String, BTreeSet<String>>,
    /// Subspec paths already folded into each pod's entry.
    folded: HashMap<String, HashSet<String>>,
    /// Specs fetched during this run, keyed by pod name.
    specs: HashMap<String, Arc<PodSpec>>,
}

impl ResolutionState {
    fn into_map(self) -> DependencyMap {
        self.entries
            .into_iter()
            .map(|(name, deps)| (name, deps.into_iter().collect()))
            .collect()
    }
}

pub struct DependencyResolver<'a> {
    context: ResolutionContext<'a>,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(context: ResolutionContext<'a>) -> Self {
        Self { context }
    }

    pub fn with_source(spec_source: &'a dyn SpecSource) -> Self {
        Self::new(ResolutionContext::new(spec_source))
    }

    /// Resolves `requirements` into the flat dependency map. All or nothing:
    /// any lookup failure discards the partial result.
    pub fn resolve(&self, requirements: &[Requirement]) -> Result<DependencyMap> {
        if requirements.is_empty() {
            error!("No requirements to resolve.");
            return Err(PodscanError::NotFound(
                "No pods declared in any target".to_string(),
            ));
        }

        debug!(
            "Starting dependency resolution for {} requirement(s): {:?}",
            requirements.len(),
            requirements.iter().map(ToString::to_string).collect::<Vec<_>>()
        );

        let mut state = ResolutionState::default();
        for requirement in requirements {
            if let Err(e) = self.visit(requirement, &mut state) {
                error!("Resolution failed for '{}': {}", requirement, e);
                return Err(e);
            }
        }

        let map = state.into_map();
        debug!("Resolved {} pod(s).", map.len());
        Ok(map)
    }

    fn visit(&self, requirement: &Requirement, state: &mut ResolutionState) -> Result<()> {
        let name = requirement.name.as_str();
        let spec = self.load_spec(requirement, state)?;

        let first_visit = !state.entries.contains_key(name);
        let mut pending: VecDeque<String> =
            selection_paths(&spec, &requirement.subspecs)?.into();
        let mut direct = BTreeSet::new();
        let mut outgoing = Vec::new();

        // -------- mark before recursing ---------------------------------------------------
        if first_visit {
            state.entries.insert(name.to_string(), BTreeSet::new());
            self.split_dependencies(
                name,
                &spec,
                spec.dependency_requirements(),
                &mut pending,
                &mut direct,
                &mut outgoing,
            )?;
        }

        let folded = state.folded.entry(name.to_string()).or_default();
        let mut newly_folded = 0usize;
        while let Some(path) = pending.pop_front() {
            if !folded.insert(path.clone()) {
                continue;
            }
            newly_folded += 1;
            let subspec = spec.require_subspec(&path)?;
            debug!("Folding subspec '{}/{}'", name, path);
            self.split_dependencies(
                name,
                &spec,
                to_requirements(&subspec.dependencies),
                &mut pending,
                &mut direct,
                &mut outgoing,
            )?;
        }

        if !first_visit && newly_folded == 0 {
            debug!("'{}' already resolved for {}.", name, requirement);
            return Ok(());
        }

        if let Some(entry) = state.entries.get_mut(name) {
            entry.extend(direct);
        }

        // --------------------------------------------------------------------- recurse ----
        for dependency in &outgoing {
            debug!("Evaluating edge: parent='{}', child='{}'", name, dependency);
            self.visit(dependency, state)?;
        }

        debug!("Finished resolving '{}'", name);
        Ok(())
    }

    fn load_spec(
        &self,
        requirement: &Requirement,
        state: &mut ResolutionState,
    ) -> Result<Arc<PodSpec>> {
        let name = &requirement.name;
        if let Some(spec) = state.specs.get(name) {
            if let Some(wanted) = &requirement.version {
                debug!(
                    "Reusing '{}' {} for later constraint '{}'",
                    name, spec.version, wanted
                );
            }
            return Ok(Arc::clone(spec));
        }

        debug!("Loading podspec for '{}'", name);
        let spec = self
            .context
            .spec_source
            .find(name, requirement.version.as_deref())?;
        state.specs.insert(name.clone(), Arc::clone(&spec));
        Ok(spec)
    }

    /// Sorts declared dependencies of `spec` into sibling subspecs (queued on
    /// `pending`) and dependencies on other pods (named in `direct`, queued
    /// for a visit on `outgoing`). `owner` is the name the pod was required
    /// under; the spec's own `name` counts as the same pod.
    fn split_dependencies(
        &self,
        owner: &str,
        spec: &PodSpec,
        dependencies: Vec<Requirement>,
        pending: &mut VecDeque<String>,
        direct: &mut BTreeSet<String>,
        outgoing: &mut Vec<Requirement>,
    ) -> Result<()> {
        for dependency in dependencies {
            if dependency.name == owner || dependency.name == spec.name {
                pending.extend(selection_paths(spec, &dependency.subspecs)?);
                continue;
            }
            direct.insert(dependency.name.clone());
            outgoing.push(self.activate(dependency));
        }
        Ok(())
    }

    fn activate(&self, mut dependency: Requirement) -> Requirement {
        if self.context.subspec_activation == SubspecActivation::All {
            dependency.subspecs = SubspecSelection::Unqualified;
        }
        dependency
    }
}

/// Subspec paths to fold for a selection. A named path brings its parent
/// chain and everything nested below it.
fn selection_paths(spec: &PodSpec, selection: &SubspecSelection) -> Result<Vec<String>> {
    match selection {
        SubspecSelection::Unqualified => Ok(spec.all_subspec_paths()),
        SubspecSelection::Qualified(paths) => {
            let mut out = Vec::new();
            for path in paths {
                spec.require_subspec(path)?;
                out.extend(parent_paths(path));
                out.push(path.clone());
                out.extend(spec.nested_subspec_paths(path));
            }
            Ok(out)
        }
    }
}
