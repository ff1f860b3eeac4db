pub mod factory;
pub mod project;
pub mod template;

pub use factory::WorkbenchComponentFactory;
pub use project::{Collaborators, Project};
pub use template::ProjectTemplate;
