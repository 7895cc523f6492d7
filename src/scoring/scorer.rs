use std::cmp::Ordering;
use tracing::debug;

use super::error::ScoringError;
use super::types::{ScoredDocument, TopN};

/// Turns (query, document) pairs into one relevance score per document.
///
/// Implementations must return scores in input order. They are shared across
/// requests behind an `Arc` and may be called from several threads at once.
pub trait Scorer: Send + Sync {
    fn score(&self, query: &str, documents: &[String]) -> Result<Vec<f32>, ScoringError>;

    /// `false` when running without model weights.
    fn is_model_loaded(&self) -> bool;

    fn device_label(&self) -> &'static str {
        "cpu"
    }
}

/// Sort key: NaN ranks below every number and `-0.0` ties with `0.0`.
fn sort_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else if score == 0.0 {
        0.0
    } else {
        score
    }
}

/// Descending by score, NaN last, ties by ascending index.
fn by_relevance(a: &ScoredDocument, b: &ScoredDocument) -> Ordering {
    sort_key(b.relevance_score)
        .total_cmp(&sort_key(a.relevance_score))
        .then_with(|| a.index.cmp(&b.index))
}

/// Pairs each score with its position, ranks, and applies `top_n`.
pub fn rank(scores: &[f32], top_n: TopN) -> Vec<ScoredDocument> {
    let mut ranked: Vec<ScoredDocument> = scores
        .iter()
        .enumerate()
        .map(|(index, &score)| ScoredDocument::new(index, score))
        .collect();

    ranked.sort_by(by_relevance);
    ranked.truncate(top_n.apply(scores.len()));
    ranked
}

/// Scores `documents` with `scorer` and returns them ranked.
///
/// An empty document list never reaches the scorer.
pub fn rerank(
    scorer: &dyn Scorer,
    query: &str,
    documents: &[String],
    top_n: TopN,
) -> Result<Vec<ScoredDocument>, ScoringError> {
    if documents.is_empty() {
        return Ok(Vec::new());
    }

    let scores = scorer.score(query, documents)?;
    if scores.len() != documents.len() {
        return Err(ScoringError::ScoreCountMismatch {
            expected: documents.len(),
            actual: scores.len(),
        });
    }

    let ranked = rank(&scores, top_n);

    debug!(
        num_documents = documents.len(),
        returned = ranked.len(),
        top_score = ranked.first().map(|d| d.relevance_score),
        "Reranking complete"
    );

    Ok(ranked)
}
