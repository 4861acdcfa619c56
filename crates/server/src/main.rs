//! # racksearch-server
//!
//! HTTP API for searching the book rack sheet.

mod api;
mod state;

use anyhow::{anyhow, Context};
use clap::Parser;
use racksearch_core::{AdminGate, ConfigStore};
use racksearch_http::SheetClient;
use state::{AppState, DEFAULT_CACHE_TTL};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// racksearch-server - JSON API over the book rack sheet
#[derive(Parser)]
#[command(name = "racksearch-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "RACKSEARCH_BIND", default_value = "0.0.0.0:3000")]
    bind: String,

    /// Configuration file
    #[arg(
        short,
        long,
        env = "RACKSEARCH_CONFIG",
        default_value = ConfigStore::DEFAULT_FILE
    )]
    config: PathBuf,

    /// Seconds a fetched sheet is served before it is fetched again
    #[arg(
        long,
        env = "RACKSEARCH_CACHE_TTL",
        default_value_t = DEFAULT_CACHE_TTL.as_secs()
    )]
    cache_ttl: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let gate = AdminGate::from_env();
    if !gate.is_enabled() {
        tracing::warn!("no admin secret set, configuration changes are disabled");
    }

    let client = SheetClient::new().map_err(|e| anyhow!("{e}"))?;
    let state = AppState::with_ttl(
        ConfigStore::new(args.config),
        client,
        gate,
        Duration::from_secs(args.cache_ttl),
    );
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    tracing::info!("racksearch-server listening on {}", args.bind);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["racksearch-server"]);
        assert_eq!(args.bind, "0.0.0.0:3000");
        assert_eq!(args.config, PathBuf::from("config.json"));
        assert_eq!(args.cache_ttl, 3600);
    }

    #[test]
    fn test_args_cache_ttl() {
        let args = Args::parse_from(["racksearch-server", "--cache-ttl", "60"]);
        assert_eq!(args.cache_ttl, 60);
    }
}
