//! Normalization of extracted page text

/// Cleans raw extracted text
///
/// Unwinds escaped quotes, turns literal `\n` / `\t` sequences into spaces,
/// collapses whitespace runs to a single space and trims both ends.
pub fn sanitize_content(text: &str) -> String {
    let unescaped = text
        .replace("\\\"", "\"")
        .replace("\\'", "'")
        .replace("\\n", " ")
        .replace("\\t", " ");

    unescaped.split_whitespace().collect::<Vec<_>>().join(" ")
}
