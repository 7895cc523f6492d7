//! Ranking of scored documents.
//!
//! [`Scorer`] is the seam between the HTTP layer and the model: the gateway
//! only ever sees `Arc<dyn Scorer>`. [`rerank`] wraps a scorer call with the
//! ordering rules clients rely on:
//!
//! - one result per input document, never more
//! - descending `relevance_score`, NaN last
//! - equal scores keep ascending input index
//! - `top_n` truncates after sorting
//!
//! A scorer that returns the wrong number of scores is rejected with
//! [`ScoringError::ScoreCountMismatch`] rather than silently truncated.

pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
pub mod scorer;
pub mod types;


pub use error::ScoringError;
#[cfg(any(test, feature = "mock"))]
pub use mock::StaticScorer;
pub use scorer::{Scorer, rank, rerank};
pub use types::{ScoredDocument, TopN};
