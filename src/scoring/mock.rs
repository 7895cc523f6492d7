use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::ScoringError;
use super::scorer::Scorer;

enum Behavior {
    Fixed(Vec<f32>),
    Fail(String),
}

/// Scorer returning canned results, for router and integration tests.
pub struct StaticScorer {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl StaticScorer {
    /// Returns `scores` verbatim, whatever the documents are.
    pub fn with_scores(scores: Vec<f32>) -> Self {
        Self {
            behavior: Behavior::Fixed(scores),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every call with [`ScoringError::ComputationFailed`].
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Fail(reason.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times [`Scorer::score`] was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Scorer for StaticScorer {
    fn score(&self, _query: &str, _documents: &[String]) -> Result<Vec<f32>, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Fixed(scores) => Ok(scores.clone()),
            Behavior::Fail(reason) => Err(ScoringError::ComputationFailed {
                reason: reason.clone(),
            }),
        }
    }

    fn is_model_loaded(&self) -> bool {
        true
    }
}
