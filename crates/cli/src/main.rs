//! Swapform - token swap quotes from the command line

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use swapform_cli::{load_settings, run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting swapform v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    if let Err(e) = run(cli, settings).await {
        error!("{:#}", e);
        return Err(e);
    }

    Ok(())
}
