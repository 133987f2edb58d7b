//! Feed-driven article collection.
//!
//! Feeds are fetched one after another. Each feed contributes its latest
//! entries to the day's index; each entry's page is fetched and reduced to
//! its main text for the raw article batch. Failures are per feed or per
//! article and never abort the run.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;

use newsdigest_shared::{
    CollectConfig, DigestError, FeedSource, IndexEntry, RawArticle, Result, format_date,
};

use crate::extract::extract_main_text;
use crate::feed::{FeedEntry, parse_feed};

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// Something that went wrong for one feed or one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectFailure {
    /// Feed name from the configuration.
    pub feed: String,
    /// Article URL, when the failure was an article fetch.
    pub url: Option<String>,
    pub error: String,
}

/// Output of a collection run.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Raw articles with extracted text, one per fetched entry.
    pub articles: Vec<RawArticle>,
    /// Index rows, one per feed entry (including entries whose page failed).
    pub index: Vec<IndexEntry>,
    pub failures: Vec<CollectFailure>,
}

impl Collection {
    fn absorb(&mut self, feed: FeedOutcome) {
        self.index.extend(feed.index);
        self.articles.extend(feed.articles);
        self.failures.extend(feed.failures);
    }
}

/// What a single feed contributed.
#[derive(Debug, Default)]
struct FeedOutcome {
    articles: Vec<RawArticle>,
    index: Vec<IndexEntry>,
    failures: Vec<CollectFailure>,
}

// ---------------------------------------------------------------------------
// Collector
// ---------------------------------------------------------------------------

/// HTTP collector over the configured feeds.
pub struct Collector {
    config: CollectConfig,
    client: Client,
}

impl Collector {
    /// Build a collector with the configured user agent and timeout.
    pub fn new(config: CollectConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DigestError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Collect from every configured feed.
    pub async fn collect(&self, run_date: NaiveDate) -> Collection {
        self.collect_with(run_date, |_, _, _| {}).await
    }

    /// Collect from every configured feed, calling `on_feed(feed, current, total)`
    /// after each one (`current` is 1-based).
    #[instrument(skip_all, fields(feeds = self.config.feeds.len(), %run_date))]
    pub async fn collect_with<F>(&self, run_date: NaiveDate, mut on_feed: F) -> Collection
    where
        F: FnMut(&FeedSource, usize, usize),
    {
        let total = self.config.feeds.len();
        let mut collection = Collection::default();
        for (i, feed) in self.config.feeds.iter().enumerate() {
            collection.absorb(self.collect_feed(feed, run_date).await);
            on_feed(feed, i + 1, total);
        }

        info!(
            articles = collection.articles.len(),
            index = collection.index.len(),
            failures = collection.failures.len(),
            "collection complete"
        );
        collection
    }

    /// Collect the latest entries of one feed.
    #[instrument(skip_all, fields(feed = %feed.name))]
    async fn collect_feed(&self, feed: &FeedSource, run_date: NaiveDate) -> FeedOutcome {
        let mut outcome = FeedOutcome::default();
        let date = format_date(run_date);

        let entries = match self.fetch_entries(feed).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(url = %feed.url, error = %e, "feed failed, skipping");
                outcome.failures.push(CollectFailure {
                    feed: feed.name.clone(),
                    url: None,
                    error: e.to_string(),
                });
                return outcome;
            }
        };

        if entries.is_empty() {
            warn!(url = %feed.url, "feed has no entries");
        }

        for entry in entries.into_iter().take(self.config.entries_per_feed) {
            debug!(title = %entry.title, link = %entry.link, "feed entry");
            outcome.index.push(IndexEntry {
                date: date.clone(),
                url: entry.link.clone(),
                topic: entry.title.clone(),
            });

            match self.fetch_article(&entry).await {
                Ok(text) => {
                    if text.is_empty() {
                        warn!(url = %entry.link, "could not extract main content");
                    }
                    outcome.articles.push(RawArticle {
                        url: entry.link,
                        topic: Some(entry.title),
                        source: Some(text),
                        date: Some(date.clone()),
                    });
                }
                Err(e) => {
                    warn!(url = %entry.link, error = %e, "article fetch failed");
                    outcome.failures.push(CollectFailure {
                        feed: feed.name.clone(),
                        url: Some(entry.link),
                        error: e.to_string(),
                    });
                }
            }
        }

        outcome
    }

    async fn fetch_entries(&self, feed: &FeedSource) -> Result<Vec<FeedEntry>> {
        let url = Url::parse(&feed.url)
            .map_err(|e| DigestError::validation(format!("invalid feed URL {}: {e}", feed.url)))?;
        let body = self.fetch_text(&url).await?;
        parse_feed(&body)
    }

    async fn fetch_article(&self, entry: &FeedEntry) -> Result<String> {
        let url = Url::parse(&entry.link).map_err(|e| {
            DigestError::validation(format!("invalid article URL {}: {e}", entry.link))
        })?;
        let body = self.fetch_text(&url).await?;
        Ok(extract_main_text(&body))
    }

    async fn fetch_text(&self, url: &Url) -> Result<String> {
        debug!(%url, "fetching");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| DigestError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DigestError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| DigestError::Network(format!("{url}: body read failed: {e}")))
    }
}
