//! File stores for newsdigest.
//!
//! Two stores share one URL key space:
//! - the document collection (`contents.json`), a JSON array of
//!   [`ProcessedArticle`](newsdigest_shared::ProcessedArticle)
//! - the tabular index (`database.csv`), rows of `date,URL,topic`
//!
//! Both are append-only by URL: [`merge_into`] keeps the first occurrence of
//! every key and rewrites the file only when something new arrived. The two
//! stores are merged independently and are not reconciled with each other.

pub mod merge;
pub mod store;

pub use merge::{Keyed, MergeReport, Merged, merge};
pub use store::{
    DocumentStore, INDEX_HEADERS, IndexStore, JsonStore, Store, merge_into, write_atomic,
};
