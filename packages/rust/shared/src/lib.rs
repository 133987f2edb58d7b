//! Shared types, error model, and configuration for newsdigest.
//!
//! This crate is the foundation depended on by all other newsdigest crates.
//! It provides:
//! - [`DigestError`]: the unified error type
//! - Domain types ([`RawArticle`], [`ProcessedArticle`], [`IndexEntry`])
//! - Configuration ([`AppConfig`], runtime configs, config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CollectConfig, CollectorSection, DEFAULT_ACTION_KEYWORDS, DigestConfig,
    DigestSection, FeedSource, MergeConfig, MergeSection, RenderConfig, RenderSection,
    config_dir, config_file_path, init_config, init_config_at, load_config, load_config_from,
    validate_config,
};
pub use error::{DigestError, Result};
pub use types::{DATE_FORMAT, IndexEntry, ProcessedArticle, RawArticle, format_date};
