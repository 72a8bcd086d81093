// podscan-common/src/analyzer.rs
// Entry point from a project directory or Podfile to the flat dependency map.

use std::path::Path;

use tracing::{debug, instrument};

use crate::dependency::{DependencyMap, DependencyResolver, ResolutionContext, SubspecActivation};
use crate::error::{PodscanError, Result};
use crate::model::Podfile;
use crate::specs::SpecSource;

pub struct DependencyAnalyzer<'a> {
    spec_source: &'a dyn SpecSource,
    subspec_activation: SubspecActivation,
}

impl<'a> DependencyAnalyzer<'a> {
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

    /// Loads `Podfile.json` from `project_dir` and resolves it.
    #[instrument(skip(self), fields(dir = %project_dir.display()))]
    pub fn analyze(&self, project_dir: &Path) -> Result<DependencyMap> {
        let podfile = Podfile::load_from_dir(project_dir)?;
        self.analyze_with_podfile(&podfile)
    }

    /// Resolves every target of `podfile` as one flattened requirement list.
    pub fn analyze_with_podfile(&self, podfile: &Podfile) -> Result<DependencyMap> {
        let requirements = podfile.requirements();
        debug!(
            "Podfile declares {} target(s), {} pod(s)",
            podfile.targets.len(),
            requirements.len()
        );
        if requirements.is_empty() {
            return Err(PodscanError::NotFound(
                "No pods declared in any target of the Podfile".to_string(),
            ));
        }

        let context = ResolutionContext::new(self.spec_source)
            .with_subspec_activation(self.subspec_activation);
        DependencyResolver::new(context).resolve(&requirements)
    }
}
