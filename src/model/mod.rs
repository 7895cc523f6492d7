//! Cross-encoder model plumbing.
//!
//! - [`hub`] finds the model directory (local path or Hub download).
//! - [`reranker`] turns (query, document) pairs into logits.
//! - [`cross_encoder`] holds the encoder + classification head.

/// BERT and XLM-RoBERTa sequence classifiers.
pub mod cross_encoder;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
pub mod hub;
/// Batched cross-encoder scoring.
pub mod reranker;
/// Tokenizer loading for sentence pairs.
pub mod tokenizer;

pub use cross_encoder::{Architecture, CrossEncoder, HeadKind};
pub use error::RerankerError;
pub use hub::resolve_model_dir;
#[cfg(any(test, feature = "mock"))]
pub use reranker::lexical_score;
pub use reranker::{REQUIRED_MODEL_FILES, Reranker, RerankerConfig};
