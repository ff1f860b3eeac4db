pub mod adapters;
pub mod descriptor;

pub use descriptor::ProjectDescriptor;
