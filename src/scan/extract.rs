//! Readable article extraction from page markup
//!
//! This module turns serialized page markup into:
//! - The article title (Open Graph title, first heading, or `<title>`)
//! - The document's own `<title>`
//! - The readable body text, with navigation and page chrome stripped

use scraper::{ElementRef, Html, Selector};

/// Elements whose text never belongs to the article body
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "iframe", "nav", "header", "footer",
    "aside", "form", "button", "select",
];

/// Candidate containers for the article body, most specific first
const CONTENT_ROOTS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    "#content",
    ".post-content",
    ".entry-content",
    "body",
];

/// Text extracted from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    /// Article title, if the page declares one
    pub title: Option<String>,

    /// Text of the document's `<title>` element
    pub document_title: Option<String>,

    /// Raw readable text; whitespace is not yet normalized
    pub content: String,
}

/// Extracts the readable article from serialized markup
///
/// Returns `None` when the page has no readable text at all.
///
/// # Example
///
/// ```
/// use bookmark_sift::scan::extract_article;
///
/// let html = r#"<html><head><title>Test</title></head>
///     <body><nav>Menu</nav><article><p>Hello world</p></article></body></html>"#;
/// let article = extract_article(html).unwrap();
/// assert_eq!(article.title.as_deref(), Some("Test"));
/// assert_eq!(article.document_title.as_deref(), Some("Test"));
/// assert!(article.content.contains("Hello world"));
/// assert!(!article.content.contains("Menu"));
/// ```
pub fn extract_article(html: &str) -> Option<ExtractedArticle> {
    let document = Html::parse_document(html);

    let root = find_content_root(&document)?;
    let content = collect_text(root);

    if content.trim().is_empty() {
        return None;
    }

    Some(ExtractedArticle {
        title: extract_article_title(&document),
        document_title: select_text(&document, "title"),
        content,
    })
}

fn find_content_root(document: &Html) -> Option<ElementRef<'_>> {
    CONTENT_ROOTS.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        document
            .select(&selector)
            .find(|element| !collect_text(*element).trim().is_empty())
    })
}

/// Concatenates the text under `root`, skipping page chrome
fn collect_text(root: ElementRef<'_>) -> String {
    let mut parts = Vec::new();

    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let skipped = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != root.id())
            .filter_map(|ancestor| ancestor.value().as_element())
            .any(|element| SKIPPED_ELEMENTS.contains(&element.name()));

        if !skipped && !text.trim().is_empty() {
            parts.push(text.trim().to_string());
        }
    }

    parts.join(" ")
}

fn extract_article_title(document: &Html) -> Option<String> {
    if let Ok(selector) = Selector::parse("meta[property='og:title']") {
        let og_title = document
            .select(&selector)
            .filter_map(|element| element.value().attr("content"))
            .map(|content| content.trim().to_string())
            .find(|content| !content.is_empty());

        if og_title.is_some() {
            return og_title;
        }
    }

    select_text(document, "h1").or_else(|| select_text(document, "title"))
}

fn select_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;

    document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .find(|s| !s.is_empty())
}
