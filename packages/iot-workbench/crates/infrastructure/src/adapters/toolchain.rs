use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use domain::error::WorkbenchError;
use domain::ports::DeviceToolchain;

/// Device toolchain backed by `arduino-cli`: compile and flash the sketch
/// in the device folder.
pub struct ArduinoCliToolchain {
    fqbn: String,
}

impl ArduinoCliToolchain {
    /// `fqbn` is the fully qualified board name, e.g. `arduino:avr:uno`.
    pub fn new(fqbn: impl Into<String>) -> Self {
        Self { fqbn: fqbn.into() }
    }
}

#[async_trait]
impl DeviceToolchain for ArduinoCliToolchain {
    async fn is_installed(&self) -> bool {
        which::which("arduino-cli").is_ok()
    }

    async fn compile(&self, device_root: &Path) -> Result<bool, WorkbenchError> {
        debug!(root = %device_root.display(), fqbn = %self.fqbn, "arduino-cli compile");
        let output = Command::new("arduino-cli")
            .args(["compile", "--fqbn", &self.fqbn])
            .arg(device_root)
            .output()
            .await?;
        Ok(output.status.success())
    }

    async fn upload(&self, device_root: &Path) -> Result<bool, WorkbenchError> {
        debug!(root = %device_root.display(), fqbn = %self.fqbn, "arduino-cli upload");
        let output = Command::new("arduino-cli")
            .args(["upload", "--fqbn", &self.fqbn])
            .arg(device_root)
            .output()
            .await?;
        Ok(output.status.success())
    }
}
