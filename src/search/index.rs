//! Two-field inverted index over the bookmark corpus
//!
//! Titles and contents are indexed separately. Each field keeps postings
//! from term to (URL, term frequency), plus the distinct terms of each URL
//! so an entry can be dropped without scanning the whole vocabulary.

use crate::corpus::{BookmarkEntry, ScoredEntry};
use crate::search::fuzzy::{bounded_distance, max_edits};
use crate::search::merge::{merge_ranked, FieldHit};
use crate::search::tokenize::{query_terms, tokenize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
struct FieldIndex {
    postings: BTreeMap<String, HashMap<String, u32>>,
    doc_terms: HashMap<String, Vec<String>>,
}

impl FieldIndex {
    fn insert(&mut self, url: &str, text: &str) {
        self.remove(url);

        let mut frequencies: HashMap<String, u32> = HashMap::new();
        for term in tokenize(text) {
            *frequencies.entry(term).or_insert(0) += 1;
        }

        let mut terms = Vec::with_capacity(frequencies.len());
        for (term, frequency) in frequencies {
            self.postings
                .entry(term.clone())
                .or_default()
                .insert(url.to_string(), frequency);
            terms.push(term);
        }
        self.doc_terms.insert(url.to_string(), terms);
    }

    fn remove(&mut self, url: &str) {
        let Some(terms) = self.doc_terms.remove(url) else {
            return;
        };

        for term in terms {
            if let Some(docs) = self.postings.get_mut(&term) {
                docs.remove(url);
                if docs.is_empty() {
                    self.postings.remove(&term);
                }
            }
        }
    }

    fn clear(&mut self) {
        self.postings.clear();
        self.doc_terms.clear();
    }

    /// Indexed terms within the edit budget of `term`, with their distance
    fn matching_terms<'a>(
        &'a self,
        term: &'a str,
    ) -> Box<dyn Iterator<Item = (usize, &'a HashMap<String, u32>)> + 'a> {
        let budget = max_edits(term.chars().count());
        if budget == 0 {
            return Box::new(self.postings.get(term).map(|docs| (0, docs)).into_iter());
        }

        Box::new(self.postings.iter().filter_map(move |(candidate, docs)| {
            bounded_distance(term, candidate, budget).map(|edits| (edits, docs))
        }))
    }

    /// Scores every URL matching any of `terms`
    ///
    /// Returns hits ordered by score descending, ties by URL ascending,
    /// capped at `limit`.
    fn search(&self, terms: &[String], limit: usize) -> Vec<FieldHit> {
        let doc_count = self.doc_terms.len() as f64;
        let mut scores: HashMap<&str, f64> = HashMap::new();

        for term in terms {
            for (edits, docs) in self.matching_terms(term) {
                let idf = (1.0 + doc_count / docs.len() as f64).ln();
                let closeness = 1.0 / (1.0 + edits as f64);

                for (url, frequency) in docs {
                    let frequency = f64::from(*frequency);
                    let weight = frequency / (frequency + 1.0);
                    *scores.entry(url.as_str()).or_insert(0.0) += idf * closeness * weight;
                }
            }
        }

        let mut hits: Vec<FieldHit> = scores
            .into_iter()
            .map(|(url, score)| FieldHit {
                url: url.to_string(),
                score,
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.url.cmp(&b.url))
        });
        hits.truncate(limit);
        hits
    }
}

/// Incrementally updatable index keyed by URL over `title` and `content`
#[derive(Debug, Default)]
pub struct SearchIndex {
    title: FieldIndex,
    content: FieldIndex,
    entries: HashMap<String, BookmarkEntry>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Inserts or replaces entries
    ///
    /// Re-adding an identical entry leaves the index unchanged.
    pub fn add_or_update<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = &'a BookmarkEntry>,
    {
        for entry in entries {
            self.title.insert(&entry.url, &entry.title);
            self.content.insert(&entry.url, &entry.content);
            self.entries.insert(entry.url.clone(), entry.clone());
        }
    }

    /// Drops entries; URLs that are not indexed are ignored
    pub fn remove<'a, I>(&mut self, urls: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for url in urls {
            self.title.remove(url);
            self.content.remove(url);
            self.entries.remove(url);
        }
    }

    /// Drops everything
    pub fn clear(&mut self) {
        self.title.clear();
        self.content.clear();
        self.entries.clear();
    }

    /// Runs a ranked query over both fields
    ///
    /// Any query term may match (OR semantics). Entries matched in both
    /// fields rank first, then title-only matches, then content-only
    /// matches. At most `limit` entries are returned.
    pub fn search(&self, query: &str, limit: usize) -> Vec<ScoredEntry> {
        let terms = query_terms(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let title_hits = self.title.search(&terms, limit);
        let content_hits = self.content.search(&terms, limit);

        merge_ranked(&title_hits, &content_hits, limit)
            .into_iter()
            .filter_map(|hit| {
                self.entries.get(&hit.url).map(|entry| ScoredEntry {
                    entry: entry.clone(),
                    score: hit.score,
                })
            })
            .collect()
    }
}
