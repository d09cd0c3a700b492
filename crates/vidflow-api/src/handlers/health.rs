//! Liveness and readiness probes.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
}

/// Liveness: the process is up and serving requests.
pub async fn liveness() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "alive" }))
}

/// Readiness: every backend this process uses answers within the timeout.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let mut ready = true;

    let storage = match &state.gateway {
        Some(gateway) => {
            let (status, ok) = run_check("storage", gateway.storage.health_check()).await;
            ready &= ok;
            Some(status)
        }
        None => None,
    };

    let queue = match &state.watcher {
        Some(watcher) => {
            let (status, ok) = run_check("queue", watcher.watcher.queue().health_check()).await;
            ready &= ok;
            Some(status)
        }
        None => None,
    };

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            status: if ready { "ready" } else { "not_ready" },
            storage,
            queue,
        }),
    )
}

async fn run_check<F, E>(component: &'static str, check: F) -> (String, bool)
where
    F: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    match tokio::time::timeout(CHECK_TIMEOUT, check).await {
        Ok(Ok(())) => ("ready".to_string(), true),
        Ok(Err(e)) => {
            tracing::error!(component, error = %e, "Readiness check failed");
            (format!("not_ready: {}", e), false)
        }
        Err(_) => {
            tracing::error!(component, "Readiness check timed out");
            ("timeout".to_string(), false)
        }
    }
}
