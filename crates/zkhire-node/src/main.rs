//! ZkHire Node: entry point.
//!
//! Serves the eligibility-proof engine over HTTP with configuration from a
//! TOML file or defaults.

mod api;
mod config;
mod registry;
mod state;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use zkhire_core::VerificationMode;
use zkhire_crypto::NullifierKey;

use config::NodeConfig;
use state::AppState;

/// ZkHire Node
#[derive(Parser, Debug)]
#[command(name = "zkhire-node", version, about = "ZkHire eligibility-proof node")]
struct Args {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "zkhire.toml")]
    config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Override the verification mode (strict, permissive).
    #[arg(long)]
    verification_mode: Option<VerificationMode>,

    /// Generate a config file with a fresh nullifier key and exit.
    #[arg(long)]
    init: bool,
}

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received shutdown signal"),
        Err(e) => tracing::error!(error = %e, "failed to listen for ctrl-c"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = NodeConfig::load(&args.config)?;

    // Apply CLI overrides
    if let Some(api_port) = args.api_port {
        config.api.port = api_port;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(mode) = args.verification_mode {
        config.engine.verifier.mode = mode;
    }

    init_tracing(&config.logging.level, &config.logging.format);

    // Handle --init flag
    if args.init {
        if args.config.exists() {
            anyhow::bail!(
                "{} already exists; refusing to overwrite its nullifier key",
                args.config.display()
            );
        }
        config.engine.nullifier_key = NullifierKey::generate().to_hex();
        config.save(&args.config)?;
        tracing::info!(path = %args.config.display(), "wrote config with a fresh nullifier key");
        return Ok(());
    }

    tracing::info!("ZkHire Node v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::from_config(&config)
        .with_context(|| format!("configuring engine from {}", args.config.display()))?;
    let listen_addr = config.api_socket_addr()?;

    api::start_api_server(listen_addr, Arc::new(state), shutdown_signal()).await?;

    tracing::info!("ZkHire node exited cleanly");
    Ok(())
}
