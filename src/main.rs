//! AutoAgile - user story generation client
//!
#![doc = "AutoAgile - user story generation client"]
#![doc = "Main entry point for the AutoAgile command-line client."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use autoagile::cli::{Cli, Commands};
use autoagile::commands;
use autoagile::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Session { file } => {
            if let Some(path) = &file {
                tracing::debug!("Preselected document: {}", path.display());
            }
            commands::session::run_session(config, file).await?;
            Ok(())
        }
        Commands::Generate {
            file,
            description,
            json,
        } => {
            tracing::info!("Starting one-shot generation");
            commands::generate::run_generate(config, file, description, json).await?;
            Ok(())
        }
        Commands::Health { json } => {
            tracing::info!("Checking story service health");
            commands::health::run_health(config, json).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so `--json` output on stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "autoagile=debug"
    } else {
        "autoagile=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
