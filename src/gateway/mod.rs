//! HTTP gateway (Axum): the rerank endpoint plus liveness/readiness probes.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, GatewayError};
pub use handler::rerank_handler;
pub use payload::{RerankRequest, RerankResponse};
pub use state::HandlerState;

use crate::constants::{STATUS_HEALTHY, STATUS_READY};

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/rerank", post(rerank_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ReadyResponse {
    pub status: String,
    pub model: String,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ComponentStatus {
    pub http: String,
    pub model: String,
    /// `"real"` with weights loaded, `"stub"` for test and mock scorers.
    pub scorer_mode: String,
    pub device: String,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: STATUS_HEALTHY.to_string(),
        }),
    )
        .into_response()
}

/// The model is loaded before the listener binds, so a serving process is always ready.
#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let scorer_mode = if state.scorer.is_model_loaded() {
        "real"
    } else {
        "stub"
    };

    let components = ComponentStatus {
        http: STATUS_READY.to_string(),
        model: STATUS_READY.to_string(),
        scorer_mode: scorer_mode.to_string(),
        device: state.scorer.device_label().to_string(),
    };

    (
        StatusCode::OK,
        Json(ReadyResponse {
            status: STATUS_HEALTHY.to_string(),
            model: state.model_name.to_string(),
            components,
        }),
    )
        .into_response()
}
