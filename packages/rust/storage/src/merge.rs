//! URL-keyed, additive merge of an incoming batch into an existing store.

use std::collections::HashSet;
use std::path::PathBuf;

use newsdigest_shared::{IndexEntry, ProcessedArticle};

/// Anything stored under a URL key.
pub trait Keyed {
    /// The deduplication key. Empty keys are never merged in.
    fn key(&self) -> &str;
}

impl Keyed for ProcessedArticle {
    fn key(&self) -> &str {
        &self.url
    }
}

impl Keyed for IndexEntry {
    fn key(&self) -> &str {
        &self.url
    }
}

/// Result of [`merge`]: the full store contents plus how many entries were appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged<T> {
    /// Existing entries (unchanged, in order) followed by the new ones.
    pub entries: Vec<T>,
    /// Number of entries appended from the incoming batch.
    pub added: usize,
}

/// Append every entry of `incoming` whose key is non-empty, not already in
/// `existing`, and not seen earlier in `incoming`. Existing entries are never
/// modified, removed, or reordered; the first occurrence of a key wins.
pub fn merge<T: Keyed + Clone>(existing: Vec<T>, incoming: &[T]) -> Merged<T> {
    let mut seen: HashSet<String> = existing.iter().map(|e| e.key().to_string()).collect();
    let mut entries = existing;
    let mut added = 0;

    for item in incoming {
        let key = item.key();
        if key.is_empty() || seen.contains(key) {
            continue;
        }
        seen.insert(key.to_string());
        entries.push(item.clone());
        added += 1;
    }

    Merged { entries, added }
}

/// Outcome of merging a batch into one persisted store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Store file that was (or would have been) written.
    pub store: PathBuf,
    /// Entries in the store before the merge.
    pub existing: usize,
    /// Entries in the incoming batch.
    pub incoming: usize,
    /// Entries appended (or that would be appended in a dry run).
    pub added: usize,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Whether the store file was rewritten.
    pub written: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str, topic: &str) -> IndexEntry {
        IndexEntry {
            date: "2025-08-11".into(),
            url: url.into(),
            topic: topic.into(),
        }
    }

    #[test]
    fn appends_only_new_urls() {
        let existing = vec![entry("a", "A"), entry("b", "B")];
        let incoming = vec![entry("b", "B2"), entry("c", "C")];

        let merged = merge(existing, &incoming);
        assert_eq!(merged.added, 1);
        let urls: Vec<_> = merged.entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "b", "c"]);
        // Existing entry is not rewritten.
        assert_eq!(merged.entries[1].topic, "B");
    }

    #[test]
    fn duplicate_urls_within_batch_first_wins() {
        let incoming = vec![entry("a", "first"), entry("a", "second")];
        let merged = merge(Vec::new(), &incoming);
        assert_eq!(merged.added, 1);
        assert_eq!(merged.entries, vec![entry("a", "first")]);

        let again = merge(merged.entries.clone(), &incoming);
        assert_eq!(again.added, 0);
        assert_eq!(again.entries, merged.entries);
    }

    #[test]
    fn empty_urls_are_skipped() {
        let incoming = vec![entry("", "nothing"), entry("x", "X")];
        let merged = merge(Vec::new(), &incoming);
        assert_eq!(merged.added, 1);
        assert_eq!(merged.entries[0].url, "x");
    }

    #[test]
    fn empty_batch_leaves_store_unchanged() {
        let existing = vec![entry("a", "A")];
        let merged = merge(existing.clone(), &[]);
        assert_eq!(merged.added, 0);
        assert_eq!(merged.entries, existing);
    }

    #[test]
    fn processed_articles_keyed_by_url() {
        let article = ProcessedArticle {
            url: "https://example.com/a".into(),
            ..Default::default()
        };
        assert_eq!(article.key(), "https://example.com/a");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn batch() -> impl Strategy<Value = Vec<IndexEntry>> {
            prop::collection::vec(("[a-e]{0,2}", "[A-Z]{1,3}"), 0..12).prop_map(|pairs| {
                pairs
                    .into_iter()
                    .map(|(url, topic)| entry(&url, &topic))
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn merge_is_idempotent(existing in batch(), incoming in batch()) {
                let once = merge(existing, &incoming);
                let twice = merge(once.entries.clone(), &incoming);
                prop_assert_eq!(twice.added, 0);
                prop_assert_eq!(twice.entries, once.entries);
            }

            #[test]
            fn merge_from_unique_store_stays_unique(incoming in batch()) {
                let merged = merge(Vec::new(), &incoming);
                let mut urls: Vec<_> = merged.entries.iter().map(|e| e.url.clone()).collect();
                let before = urls.len();
                urls.sort();
                urls.dedup();
                prop_assert_eq!(urls.len(), before);
                prop_assert_eq!(merged.added, before);
            }

            #[test]
            fn existing_prefix_is_preserved(existing in batch(), incoming in batch()) {
                let merged = merge(existing.clone(), &incoming);
                prop_assert_eq!(&merged.entries[..existing.len()], &existing[..]);
                prop_assert_eq!(merged.entries.len(), existing.len() + merged.added);
            }
        }
    }
}
