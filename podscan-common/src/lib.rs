// podscan-common/src/lib.rs
pub mod analyzer;
pub mod config;
pub mod dependency;
pub mod error;
pub mod model;
pub mod specs;

// Re-export key types
pub use analyzer::DependencyAnalyzer;
pub use config::Config;
pub use dependency::{DependencyMap, DependencyResolver, SubspecActivation};
pub use error::{PodscanError, Result};
pub use model::{PodSpec, Podfile, Requirement, SubspecSelection};
pub use specs::{InMemorySpecSource, SpecRepository, SpecSource};
