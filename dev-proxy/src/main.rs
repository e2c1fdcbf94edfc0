use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dev_proxy::{DevServerConfig, ProxyTable};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Serve the dev proxy in front of the chat backend.
#[derive(Parser, Debug)]
#[command(name = "dev-proxy", version)]
struct Cli {
    /// TOML file with `listen` and `[[proxy]]` rules
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the config file
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Send `/api` to this origin instead of the configured rules
    #[arg(short, long)]
    target: Option<Url>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = DevServerConfig::load(cli.config.as_deref()).context("loading dev server config")?;
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }
    if let Some(target) = cli.target {
        config.proxy = ProxyTable::api_to(target)?;
    }

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("binding {}", config.listen))?;
    for rule in config.proxy.rules() {
        tracing::info!(
            prefix = %rule.prefix,
            target = %rule.target,
            change_origin = rule.change_origin,
            "proxy rule"
        );
    }
    tracing::info!("dev server listening on {}", config.listen);
    dev_proxy::run(listener, config.proxy).await?;
    Ok(())
}
