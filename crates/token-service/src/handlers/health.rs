//! Health check handlers.
//!
//! - `/health`: liveness, returns OK while the process serves HTTP
//! - `/ready`: readiness, requires signing credentials

use crate::models::ReadinessResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

/// Liveness check handler. Checks no dependencies.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check handler.
///
/// Returns 503 when the issuer has no credentials, since every token request
/// would fail. The message stays generic; the cause is logged.
#[tracing::instrument(skip_all, name = "token.health.readiness")]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if !state.issuer.has_credentials() {
        tracing::warn!("Readiness check failed: signing credentials not configured");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "not_ready",
                credentials: "missing",
                error: Some("Service cannot issue tokens".to_string()),
            }),
        );
    }

    (
        StatusCode::OK,
        Json(ReadinessResponse {
            status: "ready",
            credentials: "configured",
            error: None,
        }),
    )
}
