mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "iot-workbench")]
#[command(about = "Scaffold, build, provision and deploy IoT solutions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project from a template
    New(commands::new::NewCommand),
    /// Compile the device code
    Compile(commands::compile::CompileCommand),
    /// Upload the compiled device code to the board
    Upload(commands::upload::UploadCommand),
    /// Provision the cloud components
    Provision(commands::provision::ProvisionCommand),
    /// Deploy the cloud components
    Deploy(commands::deploy::DeployCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::New(cmd) => cmd.execute().await,
        Commands::Compile(cmd) => cmd.execute().await,
        Commands::Upload(cmd) => cmd.execute().await,
        Commands::Provision(cmd) => cmd.execute().await,
        Commands::Deploy(cmd) => cmd.execute().await,
    };

    if let Err(err) = result {
        render_error(&err);
        std::process::exit(1);
    }
}

fn render_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", console::style("✖").red(), err);
    if let Some(hint) = err
        .downcast_ref::<iot_workbench::domain::WorkbenchError>()
        .and_then(|e| e.suggestion())
    {
        eprintln!("  {}", console::style(hint).dim());
    }
}
