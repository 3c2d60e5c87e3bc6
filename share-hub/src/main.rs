use anyhow::Result;
use clap::Parser;
use share_hub::api::{self, AppState};
use share_hub::config::{Cli, Config};
use share_hub_core::auth::Hs256Verifier;
use share_hub_core::store::{LocalStore, RecordStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .init();

    let store: Arc<dyn RecordStore> = match &config.data_dir {
        Some(dir) => {
            let store = LocalStore::open(dir)?;
            tracing::info!(path = ?store.path(), "opened record store");
            Arc::new(store)
        }
        None => {
            tracing::warn!("no data directory configured, records kept in memory");
            Arc::new(LocalStore::in_memory())
        }
    };
    let tokens = Arc::new(Hs256Verifier::new(
        config.jwt_secret.clone(),
        config.token_ttl,
    ));
    if config.trust_user_header {
        tracing::warn!("X-User-Id header accepted as caller identity");
    }

    let app = api::router(AppState::new(store, tokens, config.trust_user_header));

    let listener = TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
