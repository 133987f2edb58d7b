//! Feed collection for newsdigest.
//!
//! Fetches RSS/Atom feeds, follows the latest entries to their pages and
//! extracts the main article text. The output is a raw article batch plus the
//! day's tabular index, ready for the record pipeline and the merger.

pub mod collector;
pub mod extract;
pub mod feed;

pub use collector::{CollectFailure, Collection, Collector};
pub use extract::{CONTENT_CLASSES, extract_main_text};
pub use feed::{FeedEntry, parse_feed};
