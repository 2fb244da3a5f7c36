pub mod health;
pub mod pages;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::accounts::handlers;
use crate::config::Config;
use crate::errors::expose_error_detail;
use crate::form::handlers::handle_preview;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let public_dir = state.config.public_dir.clone();
    let expose_detail = !state.config.environment.is_production();

    let router = Router::new()
        .route("/health", get(health::health_handler))
        .route("/register", post(handlers::handle_register))
        .route("/login", post(handlers::handle_login))
        .route("/logout", get(handlers::handle_logout))
        .route("/api/v1/session", get(handlers::handle_current_session))
        .route("/api/v1/resume/preview", post(handle_preview))
        .merge(pages::page_routes(&public_dir))
        .fallback_service(ServeDir::new(&public_dir))
        .with_state(state);

    if expose_detail {
        router.layer(middleware::from_fn(expose_error_detail))
    } else {
        router
    }
}

/// Credentialed CORS for the configured front-end origin; `None` keeps the
/// API same-origin only.
pub fn cors_layer(config: &Config) -> Result<Option<CorsLayer>> {
    let Some(origin) = &config.frontend_origin else {
        return Ok(None);
    };
    let origin: HeaderValue = origin
        .parse()
        .with_context(|| format!("FRONTEND_ORIGIN '{origin}' is not a valid header value"))?;

    Ok(Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    ))
}
