// podscan-common/src/model/mod.rs
pub mod podfile;
pub mod podspec;
pub mod requirement;

// Re-export
pub use podfile::{PodEntry, Podfile, Target};
pub use podspec::{PodSpec, SubSpec};
pub use requirement::{Requirement, SubspecSelection};
