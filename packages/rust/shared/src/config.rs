//! Application configuration for newsdigest.
//!
//! User config lives at `~/.newsdigest/newsdigest.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DigestError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "newsdigest.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".newsdigest";

/// Action verbs and outcome nouns that mark a "key event" sentence.
pub const DEFAULT_ACTION_KEYWORDS: &[&str] = &[
    "announced",
    "launched",
    "released",
    "introduced",
    "unveiled",
    "discovered",
    "developed",
    "revealed",
    "acquired",
    "reported",
    "impact",
    "result",
    "outcome",
    "effect",
];

// ---------------------------------------------------------------------------
// Config structs (matching newsdigest.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Summarization and question heuristics.
    #[serde(default)]
    pub digest: DigestSection,

    /// Store paths for the merge step.
    #[serde(default)]
    pub merge: MergeSection,

    /// Feed collection settings.
    #[serde(default)]
    pub collector: CollectorSection,

    /// HTML rendering settings.
    #[serde(default)]
    pub render: RenderSection,
}

/// `[digest]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestSection {
    /// Maximum summary length in characters.
    #[serde(default = "default_summary_cap")]
    pub summary_cap: usize,

    /// Articles whose source text is shorter than this are skipped.
    #[serde(default = "default_min_source_length")]
    pub min_source_length: usize,

    /// Vocabulary for the "key event" question.
    #[serde(default = "default_action_keywords")]
    pub action_keywords: Vec<String>,
}

impl Default for DigestSection {
    fn default() -> Self {
        Self {
            summary_cap: default_summary_cap(),
            min_source_length: default_min_source_length(),
            action_keywords: default_action_keywords(),
        }
    }
}

fn default_summary_cap() -> usize {
    2000
}
fn default_min_source_length() -> usize {
    100
}
fn default_action_keywords() -> Vec<String> {
    DEFAULT_ACTION_KEYWORDS.iter().map(|s| (*s).to_string()).collect()
}

/// `[merge]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeSection {
    /// Today's tabular index (CSV).
    #[serde(default = "default_database_in")]
    pub database_in: String,
    /// Accumulated tabular index (CSV).
    #[serde(default = "default_database_out")]
    pub database_out: String,
    /// Today's processed documents (JSON).
    #[serde(default = "default_contents_in")]
    pub contents_in: String,
    /// Accumulated document collection (JSON).
    #[serde(default = "default_contents_out")]
    pub contents_out: String,
    /// Report what would be merged without writing.
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for MergeSection {
    fn default() -> Self {
        Self {
            database_in: default_database_in(),
            database_out: default_database_out(),
            contents_in: default_contents_in(),
            contents_out: default_contents_out(),
            dry_run: false,
        }
    }
}

fn default_database_in() -> String {
    "database-today.csv".into()
}
fn default_database_out() -> String {
    "database.csv".into()
}
fn default_contents_in() -> String {
    "contents-today.json".into()
}
fn default_contents_out() -> String {
    "contents.json".into()
}

/// A named RSS/Atom feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    /// Display name used in logs.
    pub name: String,
    /// Feed URL.
    pub url: String,
}

/// `[collector]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorSection {
    /// Feeds to poll on each run.
    #[serde(default = "default_feeds")]
    pub feeds: Vec<FeedSource>,

    /// User-Agent header for feed and article requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of newest entries taken from each feed.
    #[serde(default = "default_entries_per_feed")]
    pub entries_per_feed: usize,

    /// Raw article batch written by `collect` (JSON).
    #[serde(default = "default_raw_output")]
    pub raw_output: String,

    /// Tabular index written by `collect` (CSV).
    #[serde(default = "default_database_in")]
    pub index_output: String,
}

impl Default for CollectorSection {
    fn default() -> Self {
        Self {
            feeds: default_feeds(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            entries_per_feed: default_entries_per_feed(),
            raw_output: default_raw_output(),
            index_output: default_database_in(),
        }
    }
}

fn default_feeds() -> Vec<FeedSource> {
    [
        ("TechCrunch", "https://techcrunch.com/feed/"),
        ("VentureBeat", "https://venturebeat.com/feed/"),
        ("Ars Technica", "https://feeds.arstechnica.com/arstechnica/index"),
        ("TechRadar", "https://www.techradar.com/rss"),
        ("The Verge", "https://www.theverge.com/rss/index.xml"),
        ("Engadget", "https://www.engadget.com/rss.xml"),
    ]
    .into_iter()
    .map(|(name, url)| FeedSource {
        name: name.into(),
        url: url.into(),
    })
    .collect()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; newsdigest)".into()
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_entries_per_feed() -> usize {
    1
}
fn default_raw_output() -> String {
    "contents-today.temp.json".into()
}

/// `[render]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSection {
    /// HTML output path.
    #[serde(default = "default_render_output")]
    pub output: String,

    /// Only render the N most recent articles (0 or absent = all).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Page heading.
    #[serde(default = "default_render_title")]
    pub title: String,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            output: default_render_output(),
            limit: None,
            title: default_render_title(),
        }
    }
}

fn default_render_output() -> String {
    "articles.html".into()
}
fn default_render_title() -> String {
    "Tech News Digest".into()
}

// ---------------------------------------------------------------------------
// Runtime configs (merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime heuristics for building processed records.
#[derive(Debug, Clone)]
pub struct DigestConfig {
    /// Maximum summary length in characters.
    pub summary_cap: usize,
    /// Minimum source length in characters; shorter records are skipped.
    pub min_source_length: usize,
    /// Vocabulary for the action question rule.
    pub action_keywords: Vec<String>,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for DigestConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            summary_cap: config.digest.summary_cap,
            min_source_length: config.digest.min_source_length,
            action_keywords: config.digest.action_keywords.clone(),
        }
    }
}

/// Runtime configuration for merging daily files into the stores.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub database_in: PathBuf,
    pub database_out: PathBuf,
    pub contents_in: PathBuf,
    pub contents_out: PathBuf,
    /// Compute and report, but never write.
    pub dry_run: bool,
}

impl From<&AppConfig> for MergeConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            database_in: PathBuf::from(&config.merge.database_in),
            database_out: PathBuf::from(&config.merge.database_out),
            contents_in: PathBuf::from(&config.merge.contents_in),
            contents_out: PathBuf::from(&config.merge.contents_out),
            dry_run: config.merge.dry_run,
        }
    }
}

/// Runtime configuration for feed collection.
#[derive(Debug, Clone)]
pub struct CollectConfig {
    pub feeds: Vec<FeedSource>,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub entries_per_feed: usize,
    /// Where the raw article batch is written.
    pub raw_output: PathBuf,
    /// Where today's tabular index is written.
    pub index_output: PathBuf,
}

impl From<&AppConfig> for CollectConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            feeds: config.collector.feeds.clone(),
            user_agent: config.collector.user_agent.clone(),
            timeout_secs: config.collector.timeout_secs,
            entries_per_feed: config.collector.entries_per_feed,
            raw_output: PathBuf::from(&config.collector.raw_output),
            index_output: PathBuf::from(&config.collector.index_output),
        }
    }
}

/// Runtime configuration for rendering the document store as HTML.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Document store to read (the merged `contents.json`).
    pub input: PathBuf,
    pub output: PathBuf,
    /// Keep only the N most recent articles; `None` or 0 keeps all.
    pub limit: Option<usize>,
    pub title: String,
}

impl From<&AppConfig> for RenderConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            input: PathBuf::from(&config.merge.contents_out),
            output: PathBuf::from(&config.render.output),
            limit: config.render.limit,
            title: config.render.title.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.newsdigest/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| DigestError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.newsdigest/newsdigest.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DigestError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| DigestError::config(format!("failed to parse {}: {e}", path.display())))?;

    validate_config(&config)?;
    Ok(config)
}

/// Reject settings the pipeline cannot work with.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.digest.summary_cap == 0 {
        return Err(DigestError::config("digest.summary_cap must be greater than 0"));
    }
    if config
        .digest
        .action_keywords
        .iter()
        .any(|k| k.trim().is_empty())
    {
        return Err(DigestError::config(
            "digest.action_keywords must not contain blank entries",
        ));
    }
    Ok(())
}

/// Write a default config file to `~/.newsdigest/newsdigest.toml`.
/// Returns the path to the created file.
pub fn init_config(force: bool) -> Result<PathBuf> {
    init_config_at(&config_file_path()?, force)
}

/// Write a default config file to `path`, creating parent directories.
/// An existing file is only replaced when `force` is set.
pub fn init_config_at(path: &Path, force: bool) -> Result<PathBuf> {
    if path.exists() && !force {
        return Err(DigestError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| DigestError::io(dir, e))?;
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DigestError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| DigestError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("summary_cap"));
        assert!(toml_str.contains("contents.json"));
        assert!(toml_str.contains("TechCrunch"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.digest.summary_cap, 2000);
        assert_eq!(parsed.digest.min_source_length, 100);
        assert_eq!(parsed.merge.database_out, "database.csv");
        assert_eq!(parsed.collector.feeds.len(), 6);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[digest]
min_source_length = 50

[[collector.feeds]]
name = "Example"
url = "https://example.com/feed.xml"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.digest.min_source_length, 50);
        assert_eq!(config.digest.summary_cap, 2000);
        assert_eq!(config.collector.feeds.len(), 1);
        assert_eq!(config.collector.timeout_secs, 15);
        assert!(!config.merge.dry_run);
    }

    #[test]
    fn runtime_configs_from_app_config() {
        let app = AppConfig::default();
        let digest = DigestConfig::from(&app);
        assert_eq!(digest.summary_cap, 2000);
        assert!(digest.action_keywords.iter().any(|k| k == "announced"));

        let merge = MergeConfig::from(&app);
        assert_eq!(merge.contents_in, PathBuf::from("contents-today.json"));
        assert!(!merge.dry_run);

        let collect = CollectConfig::from(&app);
        assert_eq!(collect.index_output, PathBuf::from("database-today.csv"));
        assert_eq!(collect.raw_output, PathBuf::from("contents-today.temp.json"));

        let render = RenderConfig::from(&app);
        assert_eq!(render.input, PathBuf::from("contents.json"));
        assert_eq!(render.output, PathBuf::from("articles.html"));
        assert!(render.limit.is_none());
    }

    #[test]
    fn zero_summary_cap_rejected() {
        let mut config = AppConfig::default();
        config.digest.summary_cap = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("summary_cap"));
    }

    #[test]
    fn load_config_from_file() {
        let dir = std::env::temp_dir().join(format!("nd-config-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("newsdigest.toml");
        std::fs::write(&path, "[merge]\ndry_run = true\n").unwrap();

        let config = load_config_from(&path).expect("load");
        assert!(config.merge.dry_run);

        std::fs::write(&path, "[merge\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn init_config_at_refuses_to_overwrite() {
        let dir = std::env::temp_dir().join(format!("nd-config-init-{}", uuid::Uuid::now_v7()));
        let path = dir.join("nested").join("newsdigest.toml");

        let written = init_config_at(&path, false).expect("init");
        assert_eq!(written, path);
        let loaded = load_config_from(&path).expect("load");
        assert_eq!(loaded.digest.summary_cap, 2000);

        assert!(init_config_at(&path, false).is_err());
        assert!(init_config_at(&path, true).is_ok());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
