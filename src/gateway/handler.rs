use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::gateway::error::GatewayError;
use crate::gateway::payload::{RerankRequest, RerankResponse};
use crate::gateway::state::HandlerState;
use crate::scoring::{TopN, rerank};

#[instrument(
    skip(state, payload),
    fields(
        model = tracing::field::Empty,
        documents = tracing::field::Empty,
        top_n = tracing::field::Empty
    )
)]
pub async fn rerank_handler(
    State(state): State<HandlerState>,
    payload: Result<Json<RerankRequest>, JsonRejection>,
) -> Result<Json<RerankResponse>, GatewayError> {
    let Json(request) = payload?;

    let span = tracing::Span::current();
    span.record("model", tracing::field::display(&request.model));
    span.record("documents", request.documents.len());
    if let Some(top_n) = request.top_n {
        span.record("top_n", top_n);
    }

    validate_model(&state, &request.model)?;

    let top_n = TopN::from_request(request.top_n);
    if request.documents.is_empty() {
        debug!("No documents supplied");
        return Ok(Json(RerankResponse::default()));
    }

    let scorer = Arc::clone(&state.scorer);
    let RerankRequest {
        query, documents, ..
    } = request;

    let results =
        tokio::task::spawn_blocking(move || rerank(scorer.as_ref(), &query, &documents, top_n))
            .await
            .map_err(|e| GatewayError::InternalError(format!("scoring task failed: {e}")))??;

    debug!(returned = results.len(), "Rerank request complete");

    Ok(Json(RerankResponse { results }))
}

pub(crate) fn validate_model(state: &HandlerState, requested: &str) -> Result<(), GatewayError> {
    if state.serves_model(requested) {
        Ok(())
    } else {
        Err(GatewayError::UnsupportedModel {
            requested: requested.to_string(),
        })
    }
}
