//! Diff between the known corpus and the live bookmark tree

use std::collections::{BTreeSet, HashSet};

/// URLs that must be acquired or dropped to bring the corpus in line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusDiff {
    /// Present in the live tree but not in the corpus
    pub added: BTreeSet<String>,
    /// Present in the corpus but no longer in the live tree
    pub removed: BTreeSet<String>,
}

impl CorpusDiff {
    /// Returns true if there is nothing to do
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Computes `added = current - previous` and `removed = previous - current`
///
/// URLs present on both sides appear in neither set.
pub fn diff_urls<'a, P, C>(previous: P, current: C) -> CorpusDiff
where
    P: IntoIterator<Item = &'a String>,
    C: IntoIterator<Item = &'a String>,
{
    let previous: HashSet<&str> = previous.into_iter().map(String::as_str).collect();
    let current: HashSet<&str> = current.into_iter().map(String::as_str).collect();

    let added = current
        .difference(&previous)
        .map(|url| url.to_string())
        .collect();

    let removed = previous
        .difference(&current)
        .map(|url| url.to_string())
        .collect();

    CorpusDiff { added, removed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn test_added_and_removed() {
        let previous = set(&["https://a/", "https://b/", "https://c/"]);
        let current = set(&["https://b/", "https://c/", "https://d/"]);

        let diff = diff_urls(&previous, &current);

        assert_eq!(diff.added, BTreeSet::from(["https://d/".to_string()]));
        assert_eq!(diff.removed, BTreeSet::from(["https://a/".to_string()]));
    }

    #[test]
    fn test_empty_previous_means_everything_added() {
        let current = set(&["https://a/", "https://b/"]);
        let diff = diff_urls(&Vec::new(), &current);

        assert_eq!(diff.added.len(), 2);
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn test_identical_sets() {
        let urls = set(&["https://a/", "https://b/"]);
        let diff = diff_urls(&urls, &urls);
        assert!(diff.is_empty());
    }

    #[test]
    fn test_duplicates_in_tree_collapse() {
        let current = set(&["https://a/", "https://a/"]);
        let diff = diff_urls(&Vec::new(), &current);
        assert_eq!(diff.added.len(), 1);
    }

    #[test]
    fn test_set_algebra_holds() {
        let previous = set(&["1", "2", "3", "4", "5"]);
        let current = set(&["4", "5", "6", "7"]);
        let diff = diff_urls(&previous, &current);

        let p: BTreeSet<String> = previous.iter().cloned().collect();
        let c: BTreeSet<String> = current.iter().cloned().collect();

        // Disjoint
        assert!(diff.added.is_disjoint(&diff.removed));

        // added = C \ P, removed = P \ C
        assert_eq!(diff.added, c.difference(&p).cloned().collect());
        assert_eq!(diff.removed, p.difference(&c).cloned().collect());

        // added ∪ removed ∪ (P ∩ C) = P ∪ C
        let mut covered: BTreeSet<String> = diff.added.union(&diff.removed).cloned().collect();
        covered.extend(p.intersection(&c).cloned());
        assert_eq!(covered, p.union(&c).cloned().collect());
    }
}
