use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tailor_session::backend::HttpBackend;
use tailor_session::config::{Config, StorageBackend};
use tailor_session::routes::build_router;
use tailor_session::state::AppState;
use tailor_session::storage::{FileStore, KeyValueStore, MemoryStore, RedisStore, SessionStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tailor-session v{}", env!("CARGO_PKG_VERSION"));

    // Tailoring REST API
    let backend = HttpBackend::new(
        &config.tailor_api_url,
        config.tailor_api_token.clone(),
        Duration::from_secs(config.http_timeout_secs),
    )?;
    info!("Backend client initialized ({})", config.tailor_api_url);

    // Local session storage
    let kv = open_store(&config)?;
    let store = SessionStore::new(kv);

    let state = AppState::new(Arc::new(backend), store, config.clone());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.storage_backend {
        StorageBackend::File => {
            let store = FileStore::new(config.storage_path.clone());
            info!("Session storage: file at {}", store.path().display());
            Arc::new(store)
        }
        StorageBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL is required when STORAGE_BACKEND=redis")?;
            info!("Session storage: redis (prefix '{}')", config.redis_key_prefix);
            Arc::new(RedisStore::open(url, &config.redis_key_prefix)?)
        }
        StorageBackend::Memory => {
            info!("Session storage: in-memory, nothing survives a restart");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}
