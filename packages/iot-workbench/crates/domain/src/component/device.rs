use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;

use crate::component::{Capability, Component, ComponentType};
use crate::config_keys;
use crate::error::WorkbenchError;
use crate::ports::{ConfigStore, DeviceToolchain};

/// Folder the device sources live in, relative to the project root.
pub const DEVICE_FOLDER: &str = "Device";

/// The device is never written to the component store, so it carries a
/// fixed id rather than a generated one.
pub const DEVICE_ID: &str = "device";

const CAPABILITIES: &[Capability] = &[
    Capability::Device,
    Capability::Compilable,
    Capability::Uploadable,
];

/// The physical device target (a microcontroller board). Compile and upload
/// go through the local toolchain; the board id and device path are kept in
/// the project config.
pub struct DeviceComponent {
    board_id: String,
    root: PathBuf,
    toolchain: Arc<dyn DeviceToolchain>,
    config: Arc<dyn ConfigStore>,
}

impl DeviceComponent {
    pub fn new(
        board_id: impl Into<String>,
        project_root: &Path,
        toolchain: Arc<dyn DeviceToolchain>,
        config: Arc<dyn ConfigStore>,
    ) -> Self {
        Self {
            board_id: board_id.into(),
            root: project_root.join(DEVICE_FOLDER),
            toolchain,
            config,
        }
    }

    pub fn board_id(&self) -> &str {
        &self.board_id
    }
}

#[async_trait]
impl Component for DeviceComponent {
    fn id(&self) -> &str {
        DEVICE_ID
    }

    fn name(&self) -> &str {
        "Device"
    }

    fn component_type(&self) -> ComponentType {
        ComponentType::Device
    }

    fn capabilities(&self) -> &'static [Capability] {
        CAPABILITIES
    }

    async fn check_prerequisites(&self) -> Result<bool, WorkbenchError> {
        Ok(self.toolchain.is_installed().await)
    }

    async fn load(&self) -> Result<bool, WorkbenchError> {
        if !self.root.exists() {
            return Ok(false);
        }
        Ok(self.config.get(config_keys::BOARD_ID).is_some())
    }

    async fn create(&self) -> Result<bool, WorkbenchError> {
        fs::create_dir_all(&self.root).await?;
        self.config.set(config_keys::BOARD_ID, &self.board_id)?;
        self.config.set(config_keys::DEVICE_PATH, DEVICE_FOLDER)?;
        Ok(true)
    }

    async fn compile(&self) -> Result<bool, WorkbenchError> {
        self.toolchain.compile(&self.root).await
    }

    async fn upload(&self) -> Result<bool, WorkbenchError> {
        self.toolchain.upload(&self.root).await
    }
}
