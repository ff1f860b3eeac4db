use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use iot_workbench::application::{Project, ProjectTemplate};
use iot_workbench::infrastructure::ProjectDescriptor;

#[derive(Parser, Debug)]
pub struct NewCommand {
    /// Folder to create the project in
    pub path: PathBuf,

    /// Project template (Basic, IotHub, AzureFunctions, StreamAnalytics)
    #[arg(long, short)]
    pub template: Option<String>,

    /// Board id, e.g. arduino:avr:uno
    #[arg(long, short)]
    pub board: Option<String>,
}

impl NewCommand {
    pub async fn execute(self) -> Result<()> {
        cliclack::intro(console::style("IoT Workbench").bold())?;

        let template = match &self.template {
            Some(t) => ProjectTemplate::from_str(t).map_err(anyhow::Error::msg)?,
            None => {
                let mut select = cliclack::select("Select a project template:");
                for t in ProjectTemplate::ALL {
                    select = select.item(t.as_str().to_string(), t.as_str(), "");
                }
                ProjectTemplate::from_str(&select.interact()?).map_err(anyhow::Error::msg)?
            }
        };
        let board = match self.board {
            Some(b) => b,
            None => cliclack::input("Board id:").interact()?,
        };

        let descriptor = Arc::new(ProjectDescriptor::create(&self.path));
        let mut project = Project::new(descriptor.clone(), super::collaborators(&descriptor));

        cliclack::log::step(format!("Creating {} project...", template))?;
        if project.create(template, &board).await? {
            cliclack::outro(format!(
                "Created {} project at {}",
                template,
                self.path.display()
            ))?;
        } else {
            cliclack::outro_cancel("Project creation aborted")?;
        }
        Ok(())
    }
}
