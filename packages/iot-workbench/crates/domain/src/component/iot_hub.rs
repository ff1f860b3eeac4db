use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::component::{Capability, Component, ComponentType, Dependency};
use crate::error::WorkbenchError;
use crate::ports::{CloudClient, CloudSession, ComponentStore, Scope};
use crate::resolver::{ComponentRecord, DependencyRecord};

const CAPABILITIES: &[Capability] = &[Capability::Provisionable];

/// The message hub the solution routes device telemetry through.
pub struct IotHubComponent {
    id: String,
    scope: Scope,
    store: Arc<dyn ComponentStore>,
    cloud: Arc<dyn CloudClient>,
}

impl IotHubComponent {
    pub fn new(store: Arc<dyn ComponentStore>, cloud: Arc<dyn CloudClient>, scope: Scope) -> Self {
        Self::restore(Uuid::new_v4().to_string(), store, cloud, scope)
    }

    pub fn restore(
        id: String,
        store: Arc<dyn ComponentStore>,
        cloud: Arc<dyn CloudClient>,
        scope: Scope,
    ) -> Self {
        Self {
            id,
            scope,
            store,
            cloud,
        }
    }
}

#[async_trait]
impl Component for IotHubComponent {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "IoT Hub"
    }

    fn component_type(&self) -> ComponentType {
        ComponentType::IotHub
    }

    fn capabilities(&self) -> &'static [Capability] {
        CAPABILITIES
    }

    async fn check_prerequisites(&self) -> Result<bool, WorkbenchError> {
        Ok(self.cloud.service_available().await)
    }

    async fn load(&self) -> Result<bool, WorkbenchError> {
        let records = self.store.get_sorted_components(self.scope)?;
        Ok(records.iter().any(|r| r.id == self.id))
    }

    async fn create(&self) -> Result<bool, WorkbenchError> {
        self.store.create_if_not_exists(self.scope)?;
        self.store.update_component(
            self.scope,
            ComponentRecord::new(ComponentType::IotHub, self.id.clone()),
        )?;
        Ok(true)
    }

    async fn provision(&self, session: &CloudSession) -> Result<bool, WorkbenchError> {
        self.cloud
            .provision(ComponentType::IotHub, self.name(), session)
            .await
    }
}

/// The device identity registered inside the hub. Always depends on the hub
/// it registers with.
pub struct IotHubDeviceComponent {
    id: String,
    scope: Scope,
    dependencies: Vec<Dependency>,
    store: Arc<dyn ComponentStore>,
    cloud: Arc<dyn CloudClient>,
}

impl IotHubDeviceComponent {
    pub fn new(
        dependencies: Vec<Dependency>,
        store: Arc<dyn ComponentStore>,
        cloud: Arc<dyn CloudClient>,
        scope: Scope,
    ) -> Self {
        Self::restore(Uuid::new_v4().to_string(), dependencies, store, cloud, scope)
    }

    pub fn restore(
        id: String,
        dependencies: Vec<Dependency>,
        store: Arc<dyn ComponentStore>,
        cloud: Arc<dyn CloudClient>,
        scope: Scope,
    ) -> Self {
        Self {
            id,
            scope,
            dependencies,
            store,
            cloud,
        }
    }

    fn record(&self) -> ComponentRecord {
        ComponentRecord {
            component_type: ComponentType::IotHubDevice,
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
impl Component for IotHubDeviceComponent {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "IoT Hub Device"
    }

    fn component_type(&self) -> ComponentType {
        ComponentType::IotHubDevice
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
        let records = self.store.get_sorted_components(self.scope)?;
        Ok(records.iter().any(|r| r.id == self.id))
    }

    async fn create(&self) -> Result<bool, WorkbenchError> {
        self.store.create_if_not_exists(self.scope)?;
        self.store.update_component(self.scope, self.record())?;
        Ok(true)
    }

    async fn provision(&self, session: &CloudSession) -> Result<bool, WorkbenchError> {
        self.cloud
            .provision(ComponentType::IotHubDevice, self.name(), session)
            .await
    }
}
