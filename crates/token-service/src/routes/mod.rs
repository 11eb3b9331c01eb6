//! HTTP routes for the token service.

use crate::config::Config;
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::services::TokenIssuer;
use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Request timeout applied to every route.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub issuer: TokenIssuer,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let issuer = TokenIssuer::new(&config);
        Self { config, issuer }
    }
}

/// Build the application routes.
///
/// - `/api/token` - token issuance
/// - `/health` - liveness check
/// - `/ready` - readiness check (credentials configured)
/// - `/metrics` - Prometheus scrape endpoint
///
/// Layers (inside out): timeout, trace, optional CORS, HTTP metrics.
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    let api_routes = Router::new()
        .route("/api/token", get(handlers::handle_issue_token))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    let router = api_routes
        .merge(metrics_routes)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http());

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(middleware::from_fn(http_metrics_middleware))
}

/// CORS for browser clients served from another origin. `None` when no
/// origins are configured.
fn cors_layer(allowed_origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET]),
    )
}
