// podscan-common/src/dependency/mod.rs
pub mod resolver;

pub use resolver::{
    DependencyMap, DependencyResolver, ResolutionContext, SubspecActivation,
};
