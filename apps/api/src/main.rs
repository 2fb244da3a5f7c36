mod accounts;
mod config;
mod db;
mod errors;
mod form;
mod models;
mod routes;
mod sessions;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::accounts::repository::PgAccountRepository;
use crate::accounts::store::AccountStore;
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::{build_router, cors_layer};
use crate::sessions::issuer::SessionIssuer;
use crate::sessions::store::RedisSessionStore;
use crate::state::AppState;

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

    info!(
        "Starting Resume API v{} ({:?})",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    // Both stores retry on startup, then give up and stop the process
    let db = create_pool(&config.database_url, config.store_timeout).await?;
    let session_store = RedisSessionStore::connect(&config.redis_url).await?;

    let state = AppState {
        accounts: AccountStore::new(Arc::new(PgAccountRepository::new(db)), config.store_timeout),
        sessions: SessionIssuer::new(
            Arc::new(session_store),
            &config.session_secret,
            config.store_timeout,
        ),
        config: config.clone(),
    };

    let mut app = build_router(state).layer(TraceLayer::new_for_http());
    if let Some(cors) = cors_layer(&config)? {
        info!("CORS enabled for {:?}", config.frontend_origin);
        app = app.layer(cors);
    }

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
