//! Term-overlap scorer for test and mock builds.

use std::collections::HashSet;

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| term.chars().count() > 2)
        .map(str::to_lowercase)
        .collect()
}

/// Share of distinct query terms (three or more characters) found in `document`, in `[0, 1]`.
pub fn lexical_score(query: &str, document: &str) -> f32 {
    let query_terms = terms(query);
    if query_terms.is_empty() {
        return 0.0;
    }

    let document_terms = terms(document);
    let matched = query_terms.intersection(&document_terms).count();

    matched as f32 / query_terms.len() as f32
}
