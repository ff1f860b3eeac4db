use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use domain::component::{
    AzureFunctionsComponent, Component, CosmosDbComponent, Dependency, DependencyKind,
    DeviceComponent, IotHubComponent, IotHubDeviceComponent, StreamAnalyticsJobComponent,
};
use domain::ports::{CloudClient, ComponentStore, ConfigStore, DeviceToolchain, Scope};

/// The project templates a user can create from. Each expands into a fixed
/// sub-DAG of components, device first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectTemplate {
    Basic,
    IotHub,
    AzureFunctions,
    StreamAnalytics,
}

impl ProjectTemplate {
    pub const ALL: [ProjectTemplate; 4] = [
        ProjectTemplate::Basic,
        ProjectTemplate::IotHub,
        ProjectTemplate::AzureFunctions,
        ProjectTemplate::StreamAnalytics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectTemplate::Basic => "Basic",
            ProjectTemplate::IotHub => "IotHub",
            ProjectTemplate::AzureFunctions => "AzureFunctions",
            ProjectTemplate::StreamAnalytics => "StreamAnalytics",
        }
    }
}

impl fmt::Display for ProjectTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Basic" => Ok(ProjectTemplate::Basic),
            "IotHub" => Ok(ProjectTemplate::IotHub),
            "AzureFunctions" => Ok(ProjectTemplate::AzureFunctions),
            "StreamAnalytics" => Ok(ProjectTemplate::StreamAnalytics),
            other => Err(format!("Unknown project template: {}", other)),
        }
    }
}

/// Everything template expansion needs to construct components.
pub struct TemplateContext {
    pub project_root: std::path::PathBuf,
    pub config: Arc<dyn ConfigStore>,
    pub store: Arc<dyn ComponentStore>,
    pub toolchain: Arc<dyn DeviceToolchain>,
    pub cloud: Arc<dyn CloudClient>,
}

/// Expands a template into its component list, in dependency-safe order.
///
/// Pure construction: nothing is checked, registered or written here.
pub fn expand(
    template: ProjectTemplate,
    board_id: &str,
    ctx: &TemplateContext,
) -> Vec<Arc<dyn Component>> {
    let root: &Path = &ctx.project_root;
    let device: Arc<dyn Component> = Arc::new(DeviceComponent::new(
        board_id,
        root,
        ctx.toolchain.clone(),
        ctx.config.clone(),
    ));

    match template {
        ProjectTemplate::Basic => vec![device],
        ProjectTemplate::IotHub => {
            let hub = hub(ctx);
            let hub_device = hub_device(&hub, ctx);
            vec![device, hub, hub_device]
        }
        ProjectTemplate::AzureFunctions => {
            let hub = hub(ctx);
            let hub_device = hub_device(&hub, ctx);
            let functions: Arc<dyn Component> = Arc::new(AzureFunctionsComponent::new(
                root,
                vec![input(&hub)],
                ctx.store.clone(),
                ctx.config.clone(),
                ctx.cloud.clone(),
                Scope::Project,
            ));
            vec![device, hub, hub_device, functions]
        }
        ProjectTemplate::StreamAnalytics => {
            let hub = hub(ctx);
            let cosmos: Arc<dyn Component> = Arc::new(CosmosDbComponent::new(
                ctx.store.clone(),
                ctx.cloud.clone(),
                Scope::Project,
            ));
            let job: Arc<dyn Component> = Arc::new(StreamAnalyticsJobComponent::new(
                root,
                vec![
                    input(&hub),
                    Dependency {
                        component: cosmos.clone(),
                        kind: DependencyKind::Other,
                    },
                ],
                ctx.store.clone(),
                ctx.config.clone(),
                ctx.cloud.clone(),
                Scope::Project,
            ));
            vec![device, hub, cosmos, job]
        }
    }
}

fn hub(ctx: &TemplateContext) -> Arc<dyn Component> {
    Arc::new(IotHubComponent::new(
        ctx.store.clone(),
        ctx.cloud.clone(),
        Scope::Project,
    ))
}

fn hub_device(hub: &Arc<dyn Component>, ctx: &TemplateContext) -> Arc<dyn Component> {
    Arc::new(IotHubDeviceComponent::new(
        vec![input(hub)],
        ctx.store.clone(),
        ctx.cloud.clone(),
        Scope::Project,
    ))
}

fn input(component: &Arc<dyn Component>) -> Dependency {
    Dependency {
        component: component.clone(),
        kind: DependencyKind::Input,
    }
}
