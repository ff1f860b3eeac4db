use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct DeployCommand {
    /// Project folder (defaults to the current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

impl DeployCommand {
    pub async fn execute(self) -> Result<()> {
        let project = super::load_project(self.path).await?;
        if project.deploy().await? {
            println!("{} Deploy finished", console::style("✔").green());
        } else {
            println!(
                "{} Deploy skipped (nothing eligible or declined)",
                console::style("•").dim()
            );
        }
        Ok(())
    }
}
