use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use iot_workbench::domain::config_keys;
use iot_workbench::domain::ports::ConfigStore;
use iot_workbench::infrastructure::ProjectDescriptor;

#[derive(Parser, Debug)]
pub struct ProvisionCommand {
    /// Project folder (defaults to the current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Azure resource group to provision into (persisted in the project config)
    #[arg(long)]
    pub resource_group: Option<String>,

    /// Azure subscription id (persisted in the project config)
    #[arg(long)]
    pub subscription: Option<String>,
}

impl ProvisionCommand {
    pub async fn execute(self) -> Result<()> {
        let root = super::project_root(self.path)?;
        let descriptor = Arc::new(ProjectDescriptor::open(&root)?);
        store_session_target(
            &descriptor,
            self.resource_group.as_deref(),
            self.subscription.as_deref(),
        )?;

        let project = super::load_opened(descriptor).await?;
        if project.provision().await? {
            println!("{} Provision finished", console::style("✔").green());
        } else {
            println!(
                "{} Provision skipped (nothing eligible, not signed in, no target, or declined)",
                console::style("•").dim()
            );
            println!(
                "  {}",
                console::style("Set a target with --resource-group and --subscription").dim()
            );
        }
        Ok(())
    }
}

/// Persists the provisioning target in the project config, where the cloud
/// account adapter resolves it from on this and later runs.
fn store_session_target(
    descriptor: &ProjectDescriptor,
    resource_group: Option<&str>,
    subscription: Option<&str>,
) -> Result<()> {
    if resource_group.is_none() && subscription.is_none() {
        return Ok(());
    }
    if let Some(group) = resource_group {
        descriptor.set(config_keys::RESOURCE_GROUP, group)?;
    }
    if let Some(sub) = subscription {
        descriptor.set(config_keys::SUBSCRIPTION_ID, sub)?;
    }
    descriptor.write()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_flags_persist_to_the_project_config() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("proj");
        std::fs::create_dir_all(&root).unwrap();

        let descriptor = ProjectDescriptor::create(&root);
        store_session_target(&descriptor, Some("iot-rg"), Some("sub-1")).unwrap();

        let reopened = ProjectDescriptor::open(&root).unwrap();
        assert_eq!(
            reopened.get(config_keys::RESOURCE_GROUP).as_deref(),
            Some("iot-rg")
        );
        assert_eq!(
            reopened.get(config_keys::SUBSCRIPTION_ID).as_deref(),
            Some("sub-1")
        );
    }

    #[test]
    fn no_flags_leave_the_descriptor_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("proj");
        std::fs::create_dir_all(&root).unwrap();

        let descriptor = ProjectDescriptor::create(&root);
        store_session_target(&descriptor, None, None).unwrap();

        assert!(!root.join(".iotworkbench").exists());
    }

    #[test]
    fn provision_accepts_target_flags() {
        let cmd = ProvisionCommand::try_parse_from([
            "provision",
            "--resource-group",
            "iot-rg",
            "--subscription",
            "sub-1",
        ])
        .unwrap();
        assert_eq!(cmd.resource_group.as_deref(), Some("iot-rg"));
        assert_eq!(cmd.subscription.as_deref(), Some("sub-1"));
    }
}
