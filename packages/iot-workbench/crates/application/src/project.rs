//! The lifecycle driver: runs one phase family at a time over the whole
//! component registry.
//!
//! Phase contract, shared with the components: `Ok(true)` = completed,
//! `Ok(false)` = soft abort (nothing eligible, prerequisite missing, user
//! declined), `Err` = hard failure halting the remaining components. The
//! only rollback anywhere is `create`, which deletes the whole project
//! root; compile/upload/provision/deploy keep the side effects of
//! components that already finished.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};

use domain::component::{
    device::DEVICE_FOLDER, functions::FUNCTIONS_FOLDER, stream_analytics::ASA_FOLDER,
    AzureFunctionsComponent, Capability, Component, Dependency, DependencyKind, DeviceComponent,
    IotHubComponent, IotHubDeviceComponent,
};
use domain::config_keys;
use domain::error::WorkbenchError;
use domain::ports::{
    CloudAccount, CloudClient, ComponentStore, ConfigStore, DeviceToolchain, Interaction, Scope,
    Telemetry,
};
use domain::registry::ComponentRegistry;
use domain::resolver::resolve_components;
use infrastructure::ProjectDescriptor;

use crate::factory::WorkbenchComponentFactory;
use crate::template::{self, ProjectTemplate, TemplateContext};

/// External collaborators threaded into the driver and its components.
pub struct Collaborators {
    pub toolchain: Arc<dyn DeviceToolchain>,
    pub cloud: Arc<dyn CloudClient>,
    pub account: Arc<dyn CloudAccount>,
    pub interaction: Arc<dyn Interaction>,
    pub telemetry: Arc<dyn Telemetry>,
}

#[derive(Clone, Copy)]
enum BuildAction {
    Compile,
    Upload,
}

impl BuildAction {
    fn as_str(self) -> &'static str {
        match self {
            BuildAction::Compile => "compile",
            BuildAction::Upload => "upload",
        }
    }
}

pub struct Project {
    root: PathBuf,
    descriptor: Arc<ProjectDescriptor>,
    collaborators: Collaborators,
    registry: ComponentRegistry,
}

impl Project {
    pub fn new(descriptor: Arc<ProjectDescriptor>, collaborators: Collaborators) -> Self {
        Self {
            root: descriptor.root().to_path_buf(),
            descriptor,
            collaborators,
            registry: ComponentRegistry::new(),
        }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Rebuilds the registry from the persisted descriptor. Returns
    /// `Ok(false)` when the folder holds no project config at all.
    ///
    /// Prerequisite failures are logged per component here, never fatal:
    /// an uninstalled toolchain must not keep a project from opening.
    pub async fn load(&mut self) -> Result<bool> {
        if !self.descriptor.has_project_config() {
            return Ok(false);
        }

        let registry = if self.descriptor.has_component_store() {
            self.load_from_store().await?
        } else {
            // Projects predating the component store get the default
            // hub-centric registry.
            self.synthesize_legacy()?
        };

        for component in registry.iter() {
            match component.check_prerequisites().await {
                Ok(true) => {}
                Ok(false) => {
                    warn!(component = component.name(), "prerequisites not satisfied")
                }
                Err(e) => {
                    warn!(component = component.name(), error = %e, "prerequisite check failed")
                }
            }
        }

        self.registry = registry;
        self.send_event("project.load", serde_json::json!({}));
        Ok(true)
    }

    async fn load_from_store(&self) -> Result<ComponentRegistry> {
        let records = self
            .descriptor
            .get_sorted_components(Scope::Project)
            .context("Failed to read the component store")?;
        let factory = WorkbenchComponentFactory::new(
            self.root.clone(),
            Scope::Project,
            self.config(),
            self.store(),
            self.collaborators.cloud.clone(),
        );
        let resolved = resolve_components(&records, &factory).await?;

        let mut registry = ComponentRegistry::new();
        if let Some(board_id) = self.descriptor.get(config_keys::BOARD_ID) {
            let device: Arc<dyn Component> = Arc::new(DeviceComponent::new(
                board_id,
                &self.root,
                self.collaborators.toolchain.clone(),
                self.config(),
            ));
            if device.load().await? {
                registry.register(device)?;
            } else {
                warn!("device folder or board config missing, skipping device");
            }
        }
        for component in resolved.iter() {
            registry.register(component.clone())?;
        }
        Ok(registry)
    }

    fn synthesize_legacy(&self) -> Result<ComponentRegistry> {
        let mut registry = ComponentRegistry::new();
        let hub: Arc<dyn Component> = Arc::new(IotHubComponent::new(
            self.store(),
            self.collaborators.cloud.clone(),
            Scope::Project,
        ));
        let hub_input = Dependency {
            component: hub.clone(),
            kind: DependencyKind::Input,
        };
        let hub_device: Arc<dyn Component> = Arc::new(IotHubDeviceComponent::new(
            vec![hub_input.clone()],
            self.store(),
            self.collaborators.cloud.clone(),
            Scope::Project,
        ));
        registry.register(hub)?;
        registry.register(hub_device)?;

        if self.descriptor.get(config_keys::FUNCTION_PATH).is_some() {
            let functions: Arc<dyn Component> = Arc::new(AzureFunctionsComponent::new(
                &self.root,
                vec![hub_input],
                self.store(),
                self.config(),
                self.collaborators.cloud.clone(),
                Scope::Project,
            ));
            registry.register(functions)?;
        }
        Ok(registry)
    }

    /// Creates a fresh project from a template.
    ///
    /// Prerequisites for every would-be component are checked before any of
    /// them is registered. The descriptor is written only after every
    /// component's `create` succeeded; a cancelled create deletes the whole
    /// project root, a hard error propagates without cleanup.
    pub async fn create(&mut self, template: ProjectTemplate, board_id: &str) -> Result<bool> {
        let ctx = TemplateContext {
            project_root: self.root.clone(),
            config: self.config(),
            store: self.store(),
            toolchain: self.collaborators.toolchain.clone(),
            cloud: self.collaborators.cloud.clone(),
        };
        let components = template::expand(template, board_id, &ctx);

        self.descriptor
            .set(config_keys::PROJECT_TYPE, template.as_str())?;
        self.descriptor.add_folder(DEVICE_FOLDER);
        match template {
            ProjectTemplate::AzureFunctions => self.descriptor.add_folder(FUNCTIONS_FOLDER),
            ProjectTemplate::StreamAnalytics => self.descriptor.add_folder(ASA_FOLDER),
            _ => {}
        }

        if !self.create_components(components).await? {
            return Ok(false);
        }
        self.send_event(
            "project.create",
            serde_json::json!({ "template": template.as_str(), "board": board_id }),
        );
        Ok(true)
    }

    /// Drives the create phase over an explicit component list, in order.
    /// Also the seam for callers assembling a component set outside the
    /// built-in templates.
    pub async fn create_components(&mut self, components: Vec<Arc<dyn Component>>) -> Result<bool> {
        for component in &components {
            if !component.check_prerequisites().await? {
                warn!(
                    component = component.name(),
                    "prerequisites not satisfied, aborting create"
                );
                return Ok(false);
            }
        }

        for component in &components {
            self.registry.register(component.clone())?;
        }

        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create {}", self.root.display()))?;

        for component in &components {
            match component.create().await {
                Ok(true) => info!(component = component.name(), "created"),
                Ok(false) => {
                    info!(
                        component = component.name(),
                        "create cancelled, removing project root"
                    );
                    fs::remove_dir_all(&self.root)
                        .await
                        .with_context(|| format!("Failed to remove {}", self.root.display()))?;
                    self.registry = ComponentRegistry::new();
                    return Ok(false);
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Create failed on component '{}'", component.name())
                    })
                }
            }
        }

        self.descriptor
            .write()
            .context("Failed to write the project descriptor")?;
        Ok(true)
    }

    pub async fn compile(&self) -> Result<bool> {
        self.build_phase(Capability::Compilable, BuildAction::Compile)
            .await
    }

    pub async fn upload(&self) -> Result<bool> {
        self.build_phase(Capability::Uploadable, BuildAction::Upload)
            .await
    }

    async fn build_phase(&self, capability: Capability, action: BuildAction) -> Result<bool> {
        let phase = action.as_str();
        let eligible = self.registry.with_capability(capability);
        if eligible.is_empty() {
            info!(phase, "no component implements this phase");
            return Ok(false);
        }

        for component in &eligible {
            if !component.check_prerequisites().await? {
                warn!(
                    phase,
                    component = component.name(),
                    "prerequisites not satisfied, skipping phase"
                );
                return Ok(false);
            }
        }

        for component in &eligible {
            let ok = match action {
                BuildAction::Compile => component.compile().await,
                BuildAction::Upload => component.upload().await,
            }
            .with_context(|| format!("{} failed on component '{}'", phase, component.name()))?;
            if !ok {
                return Err(WorkbenchError::PhaseFailed {
                    phase: action.as_str(),
                    component: component.name().to_string(),
                }
                .into());
            }
            info!(phase, component = component.name(), "done");
        }

        self.send_event(&format!("project.{}", phase), serde_json::json!({}));
        Ok(true)
    }

    /// Provisions the cloud components. Requires a signed-in account and a
    /// resolved resource-group/subscription pair before any component acts;
    /// each eligible component is confirmed interactively first.
    pub async fn provision(&self) -> Result<bool> {
        let eligible = self.eligible(Capability::Provisionable).await?;
        if eligible.is_empty() {
            info!("nothing to provision");
            return Ok(false);
        }

        if !self.collaborators.account.check_login().await? {
            warn!("not signed in to the cloud account");
            return Ok(false);
        }
        let Some(session) = self.collaborators.account.resource_group().await? else {
            warn!("no resource group and subscription selected");
            return Ok(false);
        };

        for (index, component) in eligible.iter().enumerate() {
            if !self.confirm("Provision process", &eligible, index).await? {
                info!(component = component.name(), "provision declined");
                return Ok(false);
            }
            match component.provision(&session).await {
                Ok(true) => info!(component = component.name(), "provisioned"),
                Ok(false) => {
                    warn!(component = component.name(), "provision reported failure");
                    return Err(WorkbenchError::PhaseFailed {
                        phase: "provision",
                        component: component.name().to_string(),
                    }
                    .into());
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Provision failed on component '{}'", component.name())
                    })
                }
            }
        }

        self.send_event("project.provision", serde_json::json!({}));
        Ok(true)
    }

    /// Deploys the deployable components, one confirmation each. No login
    /// gate here; deployment targets were fixed at provision time.
    pub async fn deploy(&self) -> Result<bool> {
        let eligible = self.eligible(Capability::Deployable).await?;
        if eligible.is_empty() {
            info!("nothing to deploy");
            return Ok(false);
        }

        for (index, component) in eligible.iter().enumerate() {
            if !self.confirm("Deploy process", &eligible, index).await? {
                info!(component = component.name(), "deploy declined");
                return Ok(false);
            }
            match component.deploy().await {
                Ok(true) => info!(component = component.name(), "deployed"),
                Ok(false) => {
                    warn!(component = component.name(), "deploy reported failure");
                    return Err(WorkbenchError::PhaseFailed {
                        phase: "deploy",
                        component: component.name().to_string(),
                    }
                    .into());
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Deploy failed on component '{}'", component.name())
                    })
                }
            }
        }

        self.send_event("project.deploy", serde_json::json!({}));
        Ok(true)
    }

    /// Components carrying the capability whose prerequisites hold, in
    /// registry order.
    async fn eligible(&self, capability: Capability) -> Result<Vec<Arc<dyn Component>>> {
        let mut eligible = Vec::new();
        for component in self.registry.with_capability(capability) {
            if component.check_prerequisites().await? {
                eligible.push(component);
            }
        }
        Ok(eligible)
    }

    /// One confirmation gate, showing the full eligible list with a marker
    /// on the component about to act.
    async fn confirm(
        &self,
        message: &str,
        eligible: &[Arc<dyn Component>],
        current: usize,
    ) -> Result<bool> {
        let options: Vec<String> = eligible
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i == current {
                    format!("> {} ({}/{})", c.name(), i + 1, eligible.len())
                } else {
                    c.name().to_string()
                }
            })
            .collect();
        let choice = self
            .collaborators
            .interaction
            .choose(message, &options)
            .await?;
        Ok(choice.is_some())
    }

    fn config(&self) -> Arc<dyn ConfigStore> {
        self.descriptor.clone()
    }

    fn store(&self) -> Arc<dyn ComponentStore> {
        self.descriptor.clone()
    }

    fn send_event(&self, name: &str, mut context: serde_json::Value) {
        if let Some(map) = context.as_object_mut() {
            map.insert(
                "timestamp".to_string(),
                serde_json::json!(chrono::Utc::now().to_rfc3339()),
            );
        }
        self.collaborators.telemetry.send_event(name, &context);
    }
}
