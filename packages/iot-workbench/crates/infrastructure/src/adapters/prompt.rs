use async_trait::async_trait;

use domain::error::WorkbenchError;
use domain::ports::Interaction;

/// Terminal confirmation surface backed by cliclack.
pub struct PromptInteraction;

#[async_trait]
impl Interaction for PromptInteraction {
    async fn choose(
        &self,
        message: &str,
        options: &[String],
    ) -> Result<Option<String>, WorkbenchError> {
        let mut select = cliclack::select(message);
        for option in options {
            select = select.item(option.clone(), option, "");
        }
        match select.interact() {
            Ok(choice) => Ok(Some(choice)),
            // Esc/Ctrl-C surfaces as an interrupted read; that's a cancel,
            // not an error.
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(WorkbenchError::Io(e)),
        }
    }
}
