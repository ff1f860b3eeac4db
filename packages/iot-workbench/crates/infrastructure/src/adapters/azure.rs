//! Azure collaborators backed by the `az` CLI. The wire protocols of the
//! individual services stay behind that binary; the core only sees the
//! narrow `CloudAccount`/`CloudClient` contracts.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use domain::component::ComponentType;
use domain::config_keys;
use domain::error::WorkbenchError;
use domain::ports::{CloudAccount, CloudClient, CloudSession, ConfigStore};

/// Login/session checks and target-scope resolution via `az`.
pub struct AzureCliAccount {
    config: Arc<dyn ConfigStore>,
}

impl AzureCliAccount {
    pub fn new(config: Arc<dyn ConfigStore>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CloudAccount for AzureCliAccount {
    async fn check_login(&self) -> Result<bool, WorkbenchError> {
        let output = Command::new("az")
            .args(["account", "show", "--output", "none"])
            .output()
            .await?;
        Ok(output.status.success())
    }

    async fn resource_group(&self) -> Result<Option<CloudSession>, WorkbenchError> {
        let group = self.config.get(config_keys::RESOURCE_GROUP);
        let subscription = self.config.get(config_keys::SUBSCRIPTION_ID);
        Ok(match (group, subscription) {
            (Some(resource_group), Some(subscription_id)) => Some(CloudSession {
                subscription_id,
                resource_group,
            }),
            _ => None,
        })
    }
}

/// Provision/deploy operations via `az`.
pub struct AzureCliClient;

impl AzureCliClient {
    fn resource_name(name: &str) -> String {
        name.to_lowercase().replace(' ', "-")
    }
}

#[async_trait]
impl CloudClient for AzureCliClient {
    async fn service_available(&self) -> bool {
        which::which("az").is_ok()
    }

    async fn provision(
        &self,
        component_type: ComponentType,
        name: &str,
        session: &CloudSession,
    ) -> Result<bool, WorkbenchError> {
        let resource = Self::resource_name(name);
        let group = session.resource_group.as_str();
        let subscription = session.subscription_id.as_str();

        let args: Vec<&str> = match component_type {
            ComponentType::IotHub => vec!["iot", "hub", "create", "--name", resource.as_str()],
            ComponentType::IotHubDevice => vec![
                "iot",
                "hub",
                "device-identity",
                "create",
                "--device-id",
                resource.as_str(),
            ],
            ComponentType::AzureFunctions => {
                vec!["functionapp", "create", "--name", resource.as_str()]
            }
            ComponentType::StreamAnalyticsJob => {
                vec!["stream-analytics", "job", "create", "--name", resource.as_str()]
            }
            ComponentType::CosmosDb => vec!["cosmosdb", "create", "--name", resource.as_str()],
            ComponentType::Device => {
                return Err(WorkbenchError::UnsupportedComponentType(
                    component_type.to_string(),
                ))
            }
        };

        debug!(component = %component_type, resource, group, "az provision");
        let output = Command::new("az")
            .args(&args)
            .args(["--resource-group", group, "--subscription", subscription])
            .output()
            .await?;
        Ok(output.status.success())
    }

    async fn deploy(
        &self,
        component_type: ComponentType,
        root: &Path,
    ) -> Result<bool, WorkbenchError> {
        let args: Vec<&str> = match component_type {
            ComponentType::AzureFunctions => vec!["functionapp", "deployment", "source", "config-zip"],
            ComponentType::StreamAnalyticsJob => vec!["stream-analytics", "job", "start"],
            _ => {
                return Err(WorkbenchError::UnsupportedComponentType(
                    component_type.to_string(),
                ))
            }
        };

        debug!(component = %component_type, root = %root.display(), "az deploy");
        let output = Command::new("az")
            .args(&args)
            .current_dir(root)
            .output()
            .await?;
        Ok(output.status.success())
    }
}
