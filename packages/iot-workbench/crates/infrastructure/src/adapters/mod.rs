pub mod azure;
pub mod prompt;
pub mod telemetry;
pub mod toolchain;

pub use azure::{AzureCliAccount, AzureCliClient};
pub use prompt::PromptInteraction;
pub use telemetry::TracingTelemetry;
pub use toolchain::ArduinoCliToolchain;
