use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// One document's position in the request and its raw model logit.
pub struct ScoredDocument {
    /// 0-based position in the request's `documents`.
    pub index: usize,
    /// Unnormalized logit.
    pub relevance_score: f32,
}

impl ScoredDocument {
    pub fn new(index: usize, relevance_score: f32) -> Self {
        Self {
            index,
            relevance_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// How many ranked results to keep.
pub enum TopN {
    /// Keep every document.
    #[default]
    All,
    /// Keep the first `n` (always > 0).
    Limit(usize),
}

impl TopN {
    /// Maps the wire value: absent, zero, or negative means no limit.
    pub fn from_request(top_n: Option<i64>) -> Self {
        match top_n {
            Some(n) if n > 0 => Self::Limit(usize::try_from(n).unwrap_or(usize::MAX)),
            _ => Self::All,
        }
    }

    /// Number of results kept out of `total`.
    pub fn apply(self, total: usize) -> usize {
        match self {
            Self::All => total,
            Self::Limit(n) => n.min(total),
        }
    }
}
