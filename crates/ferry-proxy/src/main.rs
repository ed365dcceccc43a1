//! Ferry proxy binary.
//!
//! Loads a JSON configuration file and runs the forwarding proxy until
//! interrupted.

use anyhow::Context;
use clap::Parser;
use ferry_proxy::config::Config;
use ferry_proxy::proxy::ProxyServer;
use std::path::PathBuf;
use tracing::info;

/// Ferry local forwarding proxy
#[derive(Parser, Debug)]
#[command(name = "ferry-proxy")]
#[command(
    author,
    version,
    about = "Forward path-prefixed requests to local development upstreams"
)]
struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "ferry.json")]
    config: PathBuf,

    /// Override the listen port from the configuration file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    if let Some(port) = args.port {
        config.port = port;
    }

    info!(
        "Loaded {} forwarding rules from {}",
        config.rules.len(),
        args.config.display()
    );
    for rule in &config.rules {
        info!("  {:?} -> {} ({})", rule.prefix, rule.authority(), rule.target);
    }

    ProxyServer::new(config).run().await
}
