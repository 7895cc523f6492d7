use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("unsupported model: {requested}")]
    UnsupportedModel { requested: String },

    #[error("invalid request body: {0}")]
    MalformedBody(#[from] JsonRejection),

    #[error("scoring failed: {0}")]
    ScoringFailed(#[from] ScoringError),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::UnsupportedModel { .. } => StatusCode::BAD_REQUEST,
            GatewayError::MalformedBody(rejection) => rejection.status(),
            GatewayError::ScoringFailed(_) | GatewayError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), %detail, "Request failed");
        } else {
            debug!(status = status.as_u16(), %detail, "Request rejected");
        }

        (status, Json(ErrorResponse { detail })).into_response()
    }
}
