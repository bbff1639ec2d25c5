//! Bookmark tree contract and leaf collection
//!
//! A bookmark tree is a forest of nodes; folders carry `children`, bookmarks
//! carry a `url`. Only nodes without children are ever treated as bookmarks.

use crate::SourceError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One node of the bookmark tree
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookmarkNode {
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub children: Option<Vec<BookmarkNode>>,
}

impl BookmarkNode {
    /// Creates a bookmark leaf
    pub fn link(url: impl Into<String>) -> Self {
        Self {
            title: None,
            url: Some(url.into()),
            children: None,
        }
    }

    /// Creates a folder holding the given nodes
    pub fn folder(children: Vec<BookmarkNode>) -> Self {
        Self {
            title: None,
            url: None,
            children: Some(children),
        }
    }
}

/// Source of the live bookmark tree
#[async_trait]
pub trait BookmarkSource: Send + Sync {
    /// Returns the root nodes of the bookmark tree
    async fn get_tree(&self) -> Result<Vec<BookmarkNode>, SourceError>;
}

/// Collects every bookmark URL in depth-first order
///
/// Folder nodes (anything with `children`, even an empty list) are never
/// collected. Leaves without a URL are ignored.
pub fn collect_urls(roots: &[BookmarkNode]) -> Vec<String> {
    let mut urls = Vec::new();
    for node in roots {
        collect_node(node, &mut urls);
    }
    urls
}

fn collect_node(node: &BookmarkNode, urls: &mut Vec<String>) {
    match &node.children {
        Some(children) => {
            for child in children {
                collect_node(child, urls);
            }
        }
        None => {
            if let Some(url) = &node.url {
                urls.push(url.clone());
            }
        }
    }
}

/// On-disk layouts accepted by `JsonBookmarkFile`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BookmarkFile {
    /// Chromium profile `Bookmarks` file: `{"roots": {"bookmark_bar": {...}, ...}}`
    Chromium { roots: BTreeMap<String, BookmarkNode> },
    /// Plain array of root nodes
    Nodes(Vec<BookmarkNode>),
}

/// Reads the bookmark tree from a JSON file on every call
#[derive(Debug, Clone)]
pub struct JsonBookmarkFile {
    path: PathBuf,
}

impl JsonBookmarkFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parses bookmark JSON in either supported layout
    pub fn parse(content: &str) -> Result<Vec<BookmarkNode>, SourceError> {
        let file: BookmarkFile =
            serde_json::from_str(content).map_err(|e| SourceError::Malformed(e.to_string()))?;

        Ok(match file {
            BookmarkFile::Chromium { roots } => roots.into_values().collect(),
            BookmarkFile::Nodes(nodes) => nodes,
        })
    }
}

#[async_trait]
impl BookmarkSource for JsonBookmarkFile {
    async fn get_tree(&self) -> Result<Vec<BookmarkNode>, SourceError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Read {
                path: self.path.display().to_string(),
                source,
            })?;

        Self::parse(&content)
    }
}
