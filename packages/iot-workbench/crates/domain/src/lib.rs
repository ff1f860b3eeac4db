pub mod component;
pub mod config_keys;
pub mod error;
pub mod ports;
pub mod registry;
pub mod resolver;

pub use component::{Capability, Component, ComponentType, Dependency, DependencyKind};
pub use error::WorkbenchError;
pub use registry::ComponentRegistry;
pub use resolver::{resolve_components, ComponentRecord, DependencyRecord};
