//! Top-level router: `/api/v1` routes behind auth plus `/health`.

use std::time::Duration;

use axum::{http::HeaderValue, middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::breakout::breakout_routes;
use super::middleware::{auth_middleware, AuthState};
use super::poll::poll_routes;
use super::presence::presence_routes;
use super::session::session_routes;
use super::state::ApiHandlers;

/// Cross-cutting HTTP settings.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub request_timeout: Duration,
    /// Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(parsed)
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn build_router(handlers: ApiHandlers, validator: AuthState, settings: &HttpSettings) -> Router {
    let api = Router::new()
        .merge(session_routes(handlers.sessions))
        .merge(presence_routes(handlers.presence))
        .merge(breakout_routes(handlers.breakout))
        .merge(poll_routes(handlers.polls))
        .layer(middleware::from_fn_with_state(validator, auth_middleware));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(settings.request_timeout))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors_layer(&settings.cors_origins)),
        )
}
