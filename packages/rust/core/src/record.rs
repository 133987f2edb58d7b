//! Raw article → processed article.

use chrono::NaiveDate;
use tracing::debug;

use newsdigest_shared::{DigestConfig, ProcessedArticle, RawArticle, Result, format_date};
use newsdigest_text::{QuestionGenerator, infer_topic, summarize};

/// Builds [`ProcessedArticle`]s from raw records using one set of heuristics.
#[derive(Debug)]
pub struct RecordBuilder {
    summary_cap: usize,
    min_source_length: usize,
    questions: QuestionGenerator,
}

/// Result of [`RecordBuilder::build_batch`].
#[derive(Debug, Clone, Default)]
pub struct BuiltBatch {
    pub articles: Vec<ProcessedArticle>,
    /// Records dropped for a missing or too-short source.
    pub skipped: usize,
}

impl RecordBuilder {
    pub fn new(config: &DigestConfig) -> Result<Self> {
        Ok(Self {
            summary_cap: config.summary_cap,
            min_source_length: config.min_source_length,
            questions: QuestionGenerator::new(&config.action_keywords)?,
        })
    }

    /// Build one record, or `None` when the source is missing or shorter than
    /// the configured minimum (in characters).
    pub fn build(&self, raw: &RawArticle, run_date: NaiveDate) -> Option<ProcessedArticle> {
        let Some(source) = raw.source.as_deref() else {
            debug!(url = %raw.url, "skipping record without source");
            return None;
        };

        let length = source.chars().count();
        if length < self.min_source_length {
            debug!(
                url = %raw.url,
                length,
                min = self.min_source_length,
                "skipping record with short source"
            );
            return None;
        }

        let topic = match raw.topic.as_deref() {
            Some(topic) if !topic.trim().is_empty() => topic.to_string(),
            _ => infer_topic(source),
        };

        Some(ProcessedArticle {
            date: format_date(run_date),
            url: raw.url.clone(),
            topic,
            source: source.to_string(),
            summary: summarize(source, self.summary_cap),
            questions: self.questions.generate(source),
        })
    }

    /// Build every record in `raws`, preserving order.
    pub fn build_batch(&self, raws: &[RawArticle], run_date: NaiveDate) -> BuiltBatch {
        let mut batch = BuiltBatch::default();
        for raw in raws {
            match self.build(raw, run_date) {
                Some(article) => batch.articles.push(article),
                None => batch.skipped += 1,
            }
        }
        batch
    }
}
