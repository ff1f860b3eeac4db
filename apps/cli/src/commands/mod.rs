pub mod compile;
pub mod deploy;
pub mod new;
pub mod provision;
pub mod upload;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use iot_workbench::application::{Collaborators, Project};
use iot_workbench::domain::config_keys;
use iot_workbench::domain::ports::ConfigStore;
use iot_workbench::infrastructure::adapters::{
    ArduinoCliToolchain, AzureCliAccount, AzureCliClient, PromptInteraction, TracingTelemetry,
};
use iot_workbench::infrastructure::ProjectDescriptor;

/// Wires the real collaborator adapters around a descriptor.
pub(crate) fn collaborators(descriptor: &Arc<ProjectDescriptor>) -> Collaborators {
    let config: Arc<dyn ConfigStore> = descriptor.clone();
    let fqbn = config.get(config_keys::BOARD_ID).unwrap_or_default();
    Collaborators {
        toolchain: Arc::new(ArduinoCliToolchain::new(fqbn)),
        cloud: Arc::new(AzureCliClient),
        account: Arc::new(AzureCliAccount::new(config)),
        interaction: Arc::new(PromptInteraction),
        telemetry: Arc::new(TracingTelemetry),
    }
}

/// Resolves the project folder argument (current directory by default).
pub(crate) fn project_root(path: Option<PathBuf>) -> Result<PathBuf> {
    Ok(match path {
        Some(p) => p,
        None => std::env::current_dir()?,
    })
}

/// Opens and loads the project in `path` (current directory by default).
pub(crate) async fn load_project(path: Option<PathBuf>) -> Result<Project> {
    let root = project_root(path)?;
    let descriptor = Arc::new(ProjectDescriptor::open(&root)?);
    load_opened(descriptor).await
}

/// Loads the project behind an already-opened descriptor.
pub(crate) async fn load_opened(descriptor: Arc<ProjectDescriptor>) -> Result<Project> {
    let root = descriptor.root().to_path_buf();
    let mut project = Project::new(descriptor.clone(), collaborators(&descriptor));
    if !project.load().await? {
        anyhow::bail!("No IoT Workbench project found in {}", root.display());
    }
    Ok(project)
}
