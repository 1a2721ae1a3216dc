//! dev-overlay demo - error overlay playground
//!
//! Opens a window whose content can be broken on demand, with controls
//! that stand in for the build/dev-server channel.

mod app;

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use dev_overlay::config::{self, AppConfig};
use dev_overlay::storage;

/// dev-overlay - developer error overlay demo
#[derive(Parser, Debug)]
#[command(name = "dev-overlay")]
#[command(about = "Interactive demo of the developer error overlay")]
struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the default configuration to the config path and exit
    #[arg(long)]
    write_default_config: bool,

    /// Log filter, overrides the configured one
    #[arg(long)]
    log_filter: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => Some(path.clone()),
        None => storage::default_config_path().ok(),
    };

    if args.write_default_config {
        let path = config_path
            .ok_or_else(|| anyhow::anyhow!("Could not determine a configuration path"))?;
        config::save_config(&AppConfig::default(), &path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let (config, loaded_from) = load_or_default(config_path.as_deref());

    // Initialize logging
    let filter = match &args.log_filter {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
    };
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match loaded_from {
        ConfigSource::File(path) => info!("Loaded configuration from {:?}", path),
        ConfigSource::Unreadable(path, e) => {
            warn!("Ignoring unreadable configuration {:?}: {}", path, e);
            info!("Using default configuration");
        }
        ConfigSource::Default => info!("Using default configuration"),
    }

    info!("dev-overlay demo starting...");
    if let Err(e) = app::run_demo(&config) {
        tracing::error!("Demo window error: {}", e);
    }
    info!("dev-overlay demo shutdown complete");

    Ok(())
}

/// Where the configuration came from; reported once logging is up
enum ConfigSource {
    File(PathBuf),
    Unreadable(PathBuf, anyhow::Error),
    Default,
}

/// Load configuration from file, falling back to defaults
fn load_or_default(path: Option<&Path>) -> (AppConfig, ConfigSource) {
    match path {
        Some(path) if path.exists() => match config::load_config(path) {
            Ok(config) => (config, ConfigSource::File(path.to_path_buf())),
            Err(e) => (AppConfig::default(), ConfigSource::Unreadable(path.to_path_buf(), e)),
        },
        _ => (AppConfig::default(), ConfigSource::Default),
    }
}
