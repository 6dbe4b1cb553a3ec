//! Route configuration and setup.
//!
//! Domain route groups live in [domains](domains); health checks in [health](health).

mod domains;
mod health;

use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use clipvault_core::{Config, StorageBackend};
use clipvault_storage::LOCAL_ASSETS_PATH;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let public_routes = public_routes(config, state.clone());

    // Protected routes (require authentication)
    // State is applied in upload_routes() for handlers with Multipart to work
    let protected_routes = domains::upload_routes(state.clone()).layer(
        axum::middleware::from_fn_with_state(
            state.jwt.clone(),
            crate::auth::middleware::auth_middleware,
        ),
    );

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = public_routes
        .merge(protected_routes)
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

fn public_routes(config: &Config, state: Arc<AppState>) -> Router {
    let health_state = state.clone();
    let mut router = Router::new()
        .route("/health", get(health::liveness_check))
        .route(
            "/health/ready",
            get(move || health::readiness_check(health_state.clone())),
        )
        .merge(domains::retrieval_routes(state));

    // Local backends hand out URLs under /assets; serve them.
    if config.uses_backend(StorageBackend::Local) {
        tracing::info!(
            root = %config.asset_root().display(),
            path = LOCAL_ASSETS_PATH,
            "Serving local asset root"
        );
        router = router.nest_service(LOCAL_ASSETS_PATH, ServeDir::new(config.asset_root()));
    }

    router
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
