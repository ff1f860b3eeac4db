use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::component::{Capability, Component, ComponentType};
use crate::error::WorkbenchError;
use crate::ports::{CloudClient, CloudSession, ComponentStore, Scope};
use crate::resolver::ComponentRecord;

const CAPABILITIES: &[Capability] = &[Capability::Provisionable];

/// The document store the streaming job writes into.
pub struct CosmosDbComponent {
    id: String,
    scope: Scope,
    store: Arc<dyn ComponentStore>,
    cloud: Arc<dyn CloudClient>,
}

impl CosmosDbComponent {
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
impl Component for CosmosDbComponent {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "Cosmos DB"
    }

    fn component_type(&self) -> ComponentType {
        ComponentType::CosmosDb
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
            ComponentRecord::new(ComponentType::CosmosDb, self.id.clone()),
        )?;
        Ok(true)
    }

    async fn provision(&self, session: &CloudSession) -> Result<bool, WorkbenchError> {
        self.cloud
            .provision(ComponentType::CosmosDb, self.name(), session)
            .await
    }
}
