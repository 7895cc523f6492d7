use thiserror::Error;

use crate::model::RerankerError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("reranker error: {0}")]
    Reranker(#[from] RerankerError),

    #[error("scorer returned {actual} scores for {expected} documents")]
    ScoreCountMismatch { expected: usize, actual: usize },

    #[error("scoring computation failed: {reason}")]
    ComputationFailed { reason: String },
}
