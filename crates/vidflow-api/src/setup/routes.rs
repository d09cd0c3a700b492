//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use vidflow_core::Config;

/// Server-level concurrency limit to protect against resource exhaustion under extreme load
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Build the router for the roles present in `state`.
pub fn build_router(config: &Config, state: AppState) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let mut app = Router::new()
        .route("/health", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        .route("/api/openapi.json", get(openapi_json))
        .with_state(state.clone());

    if let Some(gateway) = state.gateway {
        app = app.merge(
            Router::new()
                .route("/videos", post(handlers::video_upload::upload_video))
                .with_state(gateway),
        );
    }

    if let Some(watcher) = state.watcher {
        app = app.merge(
            Router::new()
                .route(
                    "/events/object-created",
                    post(handlers::object_events::object_created),
                )
                .with_state(watcher),
        );
    }

    Ok(app
        .layer(DefaultBodyLimit::max(config.max_upload_body_bytes()))
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
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
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
