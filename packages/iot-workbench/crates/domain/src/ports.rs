//! Contracts for the external collaborators the orchestration core needs.
//!
//! Everything behind these traits (IDE prompts, cloud SDK wire protocols,
//! settings storage, telemetry transport) is out of scope for the core and
//! reached only through these narrow request/response surfaces.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::component::{Component, ComponentType, Dependency};
use crate::error::WorkbenchError;
use crate::resolver::ComponentRecord;

/// Identity and placement for cloud provisioning, resolved once per
/// provision action and passed into every `provision()` call. Never
/// ambient/global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudSession {
    pub subscription_id: String,
    pub resource_group: String,
}

/// Distinguishes the project-local store from the workspace-wide one used
/// when multiple folders share a single descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Project,
    Workspace,
}

/// Key/value project settings store.
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), WorkbenchError>;
}

/// Ordered component dependency records, the persisted half of the registry.
///
/// `get_sorted_components` returns records in an order that is already
/// dependency-resolvable (producers before consumers); the resolver relies
/// on that guarantee and performs no topological sorting of its own.
pub trait ComponentStore: Send + Sync {
    fn create_if_not_exists(&self, scope: Scope) -> Result<(), WorkbenchError>;
    fn get_sorted_components(&self, scope: Scope) -> Result<Vec<ComponentRecord>, WorkbenchError>;
    /// Appends the record, or replaces an existing record with the same id.
    fn update_component(&self, scope: Scope, record: ComponentRecord)
        -> Result<(), WorkbenchError>;
}

/// Interactive confirmation surface.
#[async_trait]
pub trait Interaction: Send + Sync {
    /// Returns the chosen option, or `None` when the user cancelled.
    async fn choose(
        &self,
        message: &str,
        options: &[String],
    ) -> Result<Option<String>, WorkbenchError>;
}

/// Login/session check and target-scope resolution for the cloud account.
#[async_trait]
pub trait CloudAccount: Send + Sync {
    async fn check_login(&self) -> Result<bool, WorkbenchError>;
    /// Resolves the resource-group/subscription pair provisioning targets,
    /// or `None` when no target is configured.
    async fn resource_group(&self) -> Result<Option<CloudSession>, WorkbenchError>;
}

/// Best-effort event sink. Implementations must swallow their own failures.
pub trait Telemetry: Send + Sync {
    fn send_event(&self, name: &str, context: &serde_json::Value);
}

/// Local device toolchain (compiler + flasher) for the device target.
#[async_trait]
pub trait DeviceToolchain: Send + Sync {
    async fn is_installed(&self) -> bool;
    async fn compile(&self, device_root: &Path) -> Result<bool, WorkbenchError>;
    async fn upload(&self, device_root: &Path) -> Result<bool, WorkbenchError>;
}

/// Cloud-side operations for the non-device components. One request/response
/// surface per action; the per-service SDK details live behind it.
#[async_trait]
pub trait CloudClient: Send + Sync {
    async fn service_available(&self) -> bool;
    async fn provision(
        &self,
        component_type: ComponentType,
        name: &str,
        session: &CloudSession,
    ) -> Result<bool, WorkbenchError>;
    async fn deploy(
        &self,
        component_type: ComponentType,
        root: &Path,
    ) -> Result<bool, WorkbenchError>;
}

/// Builds a concrete component from a persisted record plus its resolved
/// dependency handles.
pub trait ComponentFactory: Send + Sync {
    fn build(
        &self,
        record: &ComponentRecord,
        dependencies: Vec<Dependency>,
    ) -> Result<Arc<dyn Component>, WorkbenchError>;
}
