//! Rerank library crate (used by the server binary and integration tests).
//!
//! Serves one pretrained cross-encoder behind `POST /v1/rerank`.
//!
//! - [`Config`], [`ConfigError`] - process configuration from `RERANK_*` variables
//! - [`Reranker`], [`RerankerConfig`] - tokenizer + model forward pass
//! - [`Scorer`], [`rerank`], [`ScoredDocument`], [`TopN`] - ranking rules
//! - [`gateway`] - Axum router, handlers, and error mapping
//!
//! Test doubles ([`StaticScorer`]) are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod gateway;
pub mod model;
pub mod scoring;

pub use config::{Config, ConfigError};
pub use gateway::{HandlerState, RerankRequest, RerankResponse, create_router_with_state};
pub use model::{Reranker, RerankerConfig, RerankerError};
#[cfg(any(test, feature = "mock"))]
pub use scoring::StaticScorer;
pub use scoring::{ScoredDocument, Scorer, ScoringError, TopN, rank, rerank};
