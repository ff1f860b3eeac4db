use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct CompileCommand {
    /// Project folder (defaults to the current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

impl CompileCommand {
    pub async fn execute(self) -> Result<()> {
        let project = super::load_project(self.path).await?;
        if project.compile().await? {
            println!("{} Compile finished", console::style("✔").green());
        } else {
            println!(
                "{} Nothing compiled (missing prerequisites or no device)",
                console::style("•").dim()
            );
        }
        Ok(())
    }
}
