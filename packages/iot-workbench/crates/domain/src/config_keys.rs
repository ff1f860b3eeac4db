//! Project config keys shared between components and the descriptor.

pub const BOARD_ID: &str = "boardId";
pub const PROJECT_TYPE: &str = "projectType";
pub const DEVICE_PATH: &str = "devicePath";
pub const FUNCTION_PATH: &str = "functionPath";
pub const ASA_PATH: &str = "asaPath";
pub const RESOURCE_GROUP: &str = "resourceGroup";
pub const SUBSCRIPTION_ID: &str = "subscriptionId";
