//! Bucket merge of per-field search hits

use std::collections::{HashMap, HashSet};

/// A URL matched within one field, with the engine's score for that field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldHit {
    pub url: String,
    pub score: f64,
}

/// Merges title and content hits into one ranked list of unique URLs
///
/// URLs matched in both fields come first, in title order, then the
/// remaining title hits, then the remaining content hits. The result is
/// capped at `limit`. A URL's score is the sum of its per-field scores.
pub fn merge_ranked(title: &[FieldHit], content: &[FieldHit], limit: usize) -> Vec<FieldHit> {
    let content_scores: HashMap<&str, f64> = content
        .iter()
        .map(|hit| (hit.url.as_str(), hit.score))
        .collect();
    let title_urls: HashSet<&str> = title.iter().map(|hit| hit.url.as_str()).collect();

    let both = title.iter().filter_map(|hit| {
        content_scores.get(hit.url.as_str()).map(|content_score| FieldHit {
            url: hit.url.clone(),
            score: hit.score + content_score,
        })
    });

    let title_only = title
        .iter()
        .filter(|hit| !content_scores.contains_key(hit.url.as_str()))
        .cloned();

    let content_only = content
        .iter()
        .filter(|hit| !title_urls.contains(hit.url.as_str()))
        .cloned();

    both.chain(title_only)
        .chain(content_only)
        .take(limit)
        .collect()
}
