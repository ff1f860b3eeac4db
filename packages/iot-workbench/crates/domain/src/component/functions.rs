use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use crate::component::{Capability, Component, ComponentType, Dependency};
use crate::config_keys;
use crate::error::WorkbenchError;
use crate::ports::{CloudClient, CloudSession, ComponentStore, ConfigStore, Scope};
use crate::resolver::{ComponentRecord, DependencyRecord};

/// Folder the function app lives in, relative to the project root.
pub const FUNCTIONS_FOLDER: &str = "Functions";

const CAPABILITIES: &[Capability] = &[Capability::Provisionable, Capability::Deployable];

/// Serverless function app processing hub events. Depends on the hub that
/// feeds it.
pub struct AzureFunctionsComponent {
    id: String,
    root: PathBuf,
    scope: Scope,
    dependencies: Vec<Dependency>,
    store: Arc<dyn ComponentStore>,
    config: Arc<dyn ConfigStore>,
    cloud: Arc<dyn CloudClient>,
}

impl AzureFunctionsComponent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        project_root: &Path,
        dependencies: Vec<Dependency>,
        store: Arc<dyn ComponentStore>,
        config: Arc<dyn ConfigStore>,
        cloud: Arc<dyn CloudClient>,
        scope: Scope,
    ) -> Self {
        Self::restore(
            Uuid::new_v4().to_string(),
            project_root,
            dependencies,
            store,
            config,
            cloud,
            scope,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: String,
        project_root: &Path,
        dependencies: Vec<Dependency>,
        store: Arc<dyn ComponentStore>,
        config: Arc<dyn ConfigStore>,
        cloud: Arc<dyn CloudClient>,
        scope: Scope,
    ) -> Self {
        Self {
            id,
            root: project_root.join(FUNCTIONS_FOLDER),
            scope,
            dependencies,
            store,
            config,
            cloud,
        }
    }

    fn record(&self) -> ComponentRecord {
        ComponentRecord {
            component_type: ComponentType::AzureFunctions,
            id: self.id.clone(),
            dependencies: self
                .dependencies
                .iter()
                .map(|d| DependencyRecord {
                    id: d.component.id().to_string(),
                    kind: d.kind,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl Component for AzureFunctionsComponent {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "Azure Functions"
    }

    fn component_type(&self) -> ComponentType {
        ComponentType::AzureFunctions
    }

    fn capabilities(&self) -> &'static [Capability] {
        CAPABILITIES
    }

    fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    async fn check_prerequisites(&self) -> Result<bool, WorkbenchError> {
        Ok(self.cloud.service_available().await)
    }

    async fn load(&self) -> Result<bool, WorkbenchError> {
        if !self.root.exists() {
            return Ok(false);
        }
        let records = self.store.get_sorted_components(self.scope)?;
        Ok(records.iter().any(|r| r.id == self.id))
    }

    async fn create(&self) -> Result<bool, WorkbenchError> {
        fs::create_dir_all(&self.root).await?;
        self.config
            .set(config_keys::FUNCTION_PATH, FUNCTIONS_FOLDER)?;
        self.store.create_if_not_exists(self.scope)?;
        self.store.update_component(self.scope, self.record())?;
        Ok(true)
    }

    async fn provision(&self, session: &CloudSession) -> Result<bool, WorkbenchError> {
        self.cloud
            .provision(ComponentType::AzureFunctions, self.name(), session)
            .await
    }

    async fn deploy(&self) -> Result<bool, WorkbenchError> {
        self.cloud
            .deploy(ComponentType::AzureFunctions, &self.root)
            .await
    }
}
