//! coachd server entry point.

use anyhow::Context;
use clap::Parser;
use coachd_agent::{AgentLoop, RecordStore, ToolRegistry, WebSearchConfig};
use coachd_core::{Config, StoreKind};
use coachd_gateway::AppState;
use coachd_providers::OpenAiClient;
use coachd_store::{FileSessionStore, MemorySessionStore, SessionStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// AI fitness coach gateway.
#[derive(Debug, Parser)]
#[command(name = "coachd", version, about)]
struct Cli {
    /// Path to a JSON config file.
    #[arg(long, env = "COACHD_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(long)]
    port: Option<u16>,

    /// Override the bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coachd=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    }
    .apply_env();

    if let Some(port) = cli.port {
        config.gateway.port = port;
    }
    if let Some(bind) = cli.bind {
        config.gateway.bind = bind;
    }
    config.validate().context("Invalid configuration")?;

    let api_key = config
        .provider
        .api_key
        .clone()
        .context("No API key configured; set COACHD_API_KEY or provider.api_key")?;
    let client = OpenAiClient::new(api_key)?
        .with_base_url(config.provider.api_base.clone())
        .with_model(config.provider.model.clone());

    let store: Arc<dyn SessionStore> = match config.store.kind {
        StoreKind::Memory => Arc::new(MemorySessionStore::new()),
        StoreKind::File => Arc::new(FileSessionStore::new(&config.store.path)?),
    };

    let registry = Arc::new(ToolRegistry::with_defaults(
        Arc::new(RecordStore::new()),
        WebSearchConfig::from_env(),
    ));
    let agent = AgentLoop::new(store.clone(), Arc::new(client), registry);

    let state = Arc::new(AppState {
        agent,
        store,
        config,
    });

    coachd_gateway::serve(state).await?;
    Ok(())
}
