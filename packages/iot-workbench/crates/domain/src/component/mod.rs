use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::WorkbenchError;
use crate::ports::CloudSession;

pub mod cosmos_db;
pub mod device;
pub mod functions;
pub mod iot_hub;
pub mod stream_analytics;

pub use cosmos_db::CosmosDbComponent;
pub use device::DeviceComponent;
pub use functions::AzureFunctionsComponent;
pub use iot_hub::{IotHubComponent, IotHubDeviceComponent};
pub use stream_analytics::StreamAnalyticsJobComponent;

/// The closed set of component kinds a project can contain.
///
/// Serialized names match the on-disk component store format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    Device,
    #[serde(rename = "IoTHub")]
    IotHub,
    #[serde(rename = "IoTHubDevice")]
    IotHubDevice,
    AzureFunctions,
    StreamAnalyticsJob,
    #[serde(rename = "CosmosDB")]
    CosmosDb,
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentType::Device => "Device",
            ComponentType::IotHub => "IoTHub",
            ComponentType::IotHubDevice => "IoTHubDevice",
            ComponentType::AzureFunctions => "AzureFunctions",
            ComponentType::StreamAnalyticsJob => "StreamAnalyticsJob",
            ComponentType::CosmosDb => "CosmosDB",
        };
        write!(f, "{}", name)
    }
}

/// What a component can take part in. Declared statically per component and
/// filtered by the lifecycle driver before any phase method is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Compilable,
    Uploadable,
    Provisionable,
    Deployable,
    Device,
}

/// How a component relates to one of its dependencies.
///
/// `Input` means the owning component consumes or receives data from the
/// dependency; `Other` is an unordered association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyKind {
    Input,
    Other,
}

/// A resolved edge to another live component in the registry.
#[derive(Clone)]
pub struct Dependency {
    pub component: Arc<dyn Component>,
    pub kind: DependencyKind,
}

/// A polymorphic unit of work in the project lifecycle.
///
/// Phase methods follow one contract: `Ok(true)` = done, `Ok(false)` =
/// cancelled or soft failure (the caller surfaces it and stops), `Err` =
/// hard failure. Side effects are entirely component-local; the driver
/// treats each call as opaque besides that contract.
#[async_trait]
pub trait Component: Send + Sync {
    /// Stable id, unique within a project.
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn component_type(&self) -> ComponentType;

    fn capabilities(&self) -> &'static [Capability];

    /// Resolved dependency handles, in declaration order.
    fn dependencies(&self) -> &[Dependency] {
        &[]
    }

    /// Verifies local/remote preconditions (tool installed, service
    /// reachable). Side-effect-free; must pass before any later phase.
    async fn check_prerequisites(&self) -> Result<bool, WorkbenchError>;

    /// Rehydrates in-memory state from the persisted descriptor. `Ok(false)`
    /// when required persisted state is missing or malformed.
    async fn load(&self) -> Result<bool, WorkbenchError>;

    /// First-time scaffolding (folders, config entries, store records).
    /// `Ok(false)` signals a user-cancelled, recoverable abort; the caller
    /// rolls the project back.
    async fn create(&self) -> Result<bool, WorkbenchError>;

    async fn compile(&self) -> Result<bool, WorkbenchError> {
        Ok(true)
    }

    async fn upload(&self) -> Result<bool, WorkbenchError> {
        Ok(true)
    }

    async fn provision(&self, session: &CloudSession) -> Result<bool, WorkbenchError> {
        let _ = session;
        Ok(true)
    }

    async fn deploy(&self) -> Result<bool, WorkbenchError> {
        Ok(true)
    }
}

impl dyn Component {
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}
