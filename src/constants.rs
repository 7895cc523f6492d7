//! Cross-cutting, shared constants.
//!
//! Defaults here are the single source for [`crate::config`] and
//! [`crate::model::RerankerConfig`]; keep the two in sync through these names.

/// Model identifier clients must send when `RERANK_MODEL_NAME` is unset.
pub const DEFAULT_MODEL_NAME: &str = "neofung/bge-reranker-large-1k";

pub const DEFAULT_PORT: u16 = 8000;

/// Pairs per forward pass.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 32;

pub const STATUS_READY: &str = "ready";
pub const STATUS_HEALTHY: &str = "ok";
