//! Text tokenization shared by indexing and querying

/// Splits text into lowercase alphanumeric terms
///
/// Anything that is not a letter or digit separates terms, so
/// `"Apple-Pie's"` yields `["apple", "pie", "s"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
        .collect()
}

/// Tokenizes a query, dropping repeated terms but keeping first-seen order
pub fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in tokenize(query) {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}
