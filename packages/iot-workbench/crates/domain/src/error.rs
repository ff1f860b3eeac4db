use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkbenchError {
    #[error("Component '{component}' references dependency '{dependency}' which has not been registered yet")]
    UnresolvedDependency {
        component: String,
        dependency: String,
    },

    #[error("Unsupported component type: {0}")]
    UnsupportedComponentType(String),

    #[error("Duplicate component id: {0}")]
    DuplicateComponentId(String),

    #[error("Component '{0}' could not be loaded from its persisted state")]
    ComponentLoad(String),

    #[error("Phase '{phase}' failed on component '{component}'")]
    PhaseFailed {
        phase: &'static str,
        component: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkbenchError {
    /// Returns an actionable suggestion for the error, when one exists.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            WorkbenchError::UnresolvedDependency { .. } => Some(
                "Check the component store for entries listed before their dependencies."
                    .to_string(),
            ),
            WorkbenchError::ComponentLoad(_) => Some(
                "The component's folder or store record is missing; recreate the component or remove its record."
                    .to_string(),
            ),
            _ => None,
        }
    }
}
