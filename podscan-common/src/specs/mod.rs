// podscan-common/src/specs/mod.rs
//! Lookup of authoritative pod specifications.
//!
//! The resolver only sees the [`SpecSource`] trait. Implementations may
//! cache underneath it; that cache belongs to the source, not to a
//! resolution run.

use std::sync::Arc;

use crate::error::Result;
use crate::model::PodSpec;

pub mod memory;
pub mod repository;
pub mod version;

pub use memory::InMemorySpecSource;
pub use repository::SpecRepository;
pub use version::{parse_version, VersionConstraint};

pub trait SpecSource {
    /// Returns the spec for `name` (a pod name, never a subspec path) whose
    /// version satisfies `version`, or `SpecNotFound`.
    fn find(&self, name: &str, version: Option<&str>) -> Result<Arc<PodSpec>>;
}

impl<T: SpecSource + ?Sized> SpecSource for &T {
    fn find(&self, name: &str, version: Option<&str>) -> Result<Arc<PodSpec>> {
        (**self).find(name, version)
    }
}

impl<T: SpecSource + ?Sized> SpecSource for Arc<T> {
    fn find(&self, name: &str, version: Option<&str>) -> Result<Arc<PodSpec>> {
        (**self).find(name, version)
    }
}
