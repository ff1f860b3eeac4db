use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct UploadCommand {
    /// Project folder (defaults to the current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

impl UploadCommand {
    pub async fn execute(self) -> Result<()> {
        let project = super::load_project(self.path).await?;
        if project.upload().await? {
            println!("{} Upload finished", console::style("✔").green());
        } else {
            println!(
                "{} Nothing uploaded (missing prerequisites or no device)",
                console::style("•").dim()
            );
        }
        Ok(())
    }
}
