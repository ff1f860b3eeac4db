use std::path::PathBuf;
use std::sync::Arc;

use domain::component::{
    AzureFunctionsComponent, Component, ComponentType, CosmosDbComponent, Dependency,
    IotHubComponent, IotHubDeviceComponent, StreamAnalyticsJobComponent,
};
use domain::error::WorkbenchError;
use domain::ports::{CloudClient, ComponentFactory, ComponentStore, ConfigStore, Scope};
use domain::resolver::ComponentRecord;

/// Builds concrete components from persisted records during project load.
///
/// The device target never appears in the component store and is not built
/// here; a `Device` record in the store is treated as unsupported.
pub struct WorkbenchComponentFactory {
    project_root: PathBuf,
    scope: Scope,
    config: Arc<dyn ConfigStore>,
    store: Arc<dyn ComponentStore>,
    cloud: Arc<dyn CloudClient>,
}

impl WorkbenchComponentFactory {
    pub fn new(
        project_root: PathBuf,
        scope: Scope,
        config: Arc<dyn ConfigStore>,
        store: Arc<dyn ComponentStore>,
        cloud: Arc<dyn CloudClient>,
    ) -> Self {
        Self {
            project_root,
            scope,
            config,
            store,
            cloud,
        }
    }
}

impl ComponentFactory for WorkbenchComponentFactory {
    fn build(
        &self,
        record: &ComponentRecord,
        dependencies: Vec<Dependency>,
    ) -> Result<Arc<dyn Component>, WorkbenchError> {
        let id = record.id.clone();
        Ok(match record.component_type {
            ComponentType::IotHub => Arc::new(IotHubComponent::restore(
                id,
                self.store.clone(),
                self.cloud.clone(),
                self.scope,
            )),
            ComponentType::IotHubDevice => Arc::new(IotHubDeviceComponent::restore(
                id,
                dependencies,
                self.store.clone(),
                self.cloud.clone(),
                self.scope,
            )),
            ComponentType::AzureFunctions => Arc::new(AzureFunctionsComponent::restore(
                id,
                &self.project_root,
                dependencies,
                self.store.clone(),
                self.config.clone(),
                self.cloud.clone(),
                self.scope,
            )),
            ComponentType::StreamAnalyticsJob => Arc::new(StreamAnalyticsJobComponent::restore(
                id,
                &self.project_root,
                dependencies,
                self.store.clone(),
                self.config.clone(),
                self.cloud.clone(),
                self.scope,
            )),
            ComponentType::CosmosDb => Arc::new(CosmosDbComponent::restore(
                id,
                self.store.clone(),
                self.cloud.clone(),
                self.scope,
            )),
            ComponentType::Device => {
                return Err(WorkbenchError::UnsupportedComponentType(
                    record.component_type.to_string(),
                ))
            }
        })
    }
}
