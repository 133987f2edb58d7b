//! End-to-end workflows: collect, process, merge, render, and the daily run.
//!
//! Each step takes an explicit config (paths, dates, thresholds) and returns
//! a report. The binary only builds configs and prints reports.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, instrument, warn};

use newsdigest_collector::{CollectFailure, Collector};
use newsdigest_render::{RenderOptions, render_html, select_articles};
use newsdigest_shared::{
    AppConfig, CollectConfig, DigestConfig, MergeConfig, RawArticle, RenderConfig, Result,
};
use newsdigest_storage::{
    DocumentStore, IndexStore, JsonStore, MergeReport, Store, merge_into, write_atomic,
};

use crate::record::RecordBuilder;

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Progress callback for long-running steps.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each feed has been collected.
    fn feed_collected(&self, feed: &str, current: usize, total: usize);
    /// Called when the daily run completes.
    fn done(&self, report: &RunReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn feed_collected(&self, _feed: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &RunReport) {}
}

// ---------------------------------------------------------------------------
// Collect
// ---------------------------------------------------------------------------

/// Result of [`collect`].
#[derive(Debug, Clone)]
pub struct CollectReport {
    pub articles: usize,
    pub index_rows: usize,
    pub failures: Vec<CollectFailure>,
    pub raw_output: PathBuf,
    pub index_output: PathBuf,
}

/// Fetch the configured feeds and write the day's index and raw batch.
#[instrument(skip_all, fields(feeds = config.feeds.len(), %run_date))]
pub async fn collect(
    config: &CollectConfig,
    run_date: NaiveDate,
    progress: &dyn ProgressReporter,
) -> Result<CollectReport> {
    let collector = Collector::new(config.clone())?;

    progress.phase("Collecting feeds");
    let collection = collector
        .collect_with(run_date, |feed, current, total| {
            progress.feed_collected(&feed.name, current, total);
        })
        .await;

    progress.phase("Writing daily files");
    IndexStore::new(&config.index_output).write(&collection.index)?;
    JsonStore::<RawArticle>::new(&config.raw_output).write(&collection.articles)?;

    if !collection.failures.is_empty() {
        warn!(failures = collection.failures.len(), "some feeds or articles failed");
    }
    info!(
        articles = collection.articles.len(),
        index_rows = collection.index.len(),
        "collect complete"
    );

    Ok(CollectReport {
        articles: collection.articles.len(),
        index_rows: collection.index.len(),
        failures: collection.failures,
        raw_output: config.raw_output.clone(),
        index_output: config.index_output.clone(),
    })
}

// ---------------------------------------------------------------------------
// Process
// ---------------------------------------------------------------------------

/// Configuration for [`process`].
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// Raw article batch (JSON array).
    pub input: PathBuf,
    /// Processed batch to write (JSON array).
    pub output: PathBuf,
    /// Stamped on every processed record.
    pub run_date: NaiveDate,
    pub digest: DigestConfig,
}

/// Result of [`process`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub read: usize,
    pub kept: usize,
    pub skipped: usize,
}

/// Turn a raw batch into processed records.
///
/// The input must be a readable JSON array; anything else is an error and
/// nothing is written. The output is always written, even when empty.
#[instrument(skip_all, fields(input = %config.input.display(), output = %config.output.display()))]
pub fn process(config: &ProcessConfig) -> Result<ProcessReport> {
    let builder = RecordBuilder::new(&config.digest)?;
    let raws = JsonStore::<RawArticle>::new(&config.input).read()?;

    let batch = builder.build_batch(&raws, config.run_date);
    DocumentStore::new(&config.output).write(&batch.articles)?;

    info!(
        read = raws.len(),
        kept = batch.articles.len(),
        skipped = batch.skipped,
        "process complete"
    );

    Ok(ProcessReport {
        input: config.input.clone(),
        output: config.output.clone(),
        read: raws.len(),
        kept: batch.articles.len(),
        skipped: batch.skipped,
    })
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Independent reports for the two stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    pub index: MergeReport,
    pub documents: MergeReport,
}

/// Merge the daily index and document batch into their long-lived stores.
///
/// Missing or unreadable daily files count as empty batches.
#[instrument(skip_all, fields(dry_run = config.dry_run))]
pub fn merge(config: &MergeConfig) -> Result<MergeSummary> {
    let daily_index = IndexStore::new(&config.database_in).load_or_empty();
    let index = merge_into(
        &IndexStore::new(&config.database_out),
        &daily_index,
        config.dry_run,
    )?;

    let daily_documents = DocumentStore::new(&config.contents_in).load_or_empty();
    let documents = merge_into(
        &DocumentStore::new(&config.contents_out),
        &daily_documents,
        config.dry_run,
    )?;

    info!(
        index_added = index.added,
        documents_added = documents.added,
        "merge complete"
    );
    Ok(MergeSummary { index, documents })
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

/// Result of [`render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub output: PathBuf,
    pub total: usize,
    pub rendered: usize,
}

/// Render the document store to a standalone HTML page.
#[instrument(skip_all, fields(input = %config.input.display(), output = %config.output.display()))]
pub fn render(config: &RenderConfig, generated_at: NaiveDateTime) -> Result<RenderReport> {
    let articles = DocumentStore::new(&config.input).read()?;
    let options = RenderOptions {
        title: config.title.clone(),
        limit: config.limit,
        generated_at,
    };

    let html = render_html(&articles, &options)?;
    write_atomic(&config.output, html.as_bytes())?;

    let rendered = select_articles(&articles, config.limit).len();
    info!(total = articles.len(), rendered, "render complete");

    Ok(RenderReport {
        output: config.output.clone(),
        total: articles.len(),
        rendered,
    })
}

// ---------------------------------------------------------------------------
// Daily run
// ---------------------------------------------------------------------------

/// Result of [`run_daily`].
#[derive(Debug, Clone)]
pub struct RunReport {
    pub collect: CollectReport,
    pub process: ProcessReport,
    pub merge: MergeSummary,
}

/// Collect, process and merge in one go.
///
/// The raw batch goes to `merge.contents_in` after processing, and the
/// collector's index file is the merge's daily index.
#[instrument(skip_all, fields(%run_date, dry_run = config.merge.dry_run))]
pub async fn run_daily(
    config: &AppConfig,
    run_date: NaiveDate,
    progress: &dyn ProgressReporter,
) -> Result<RunReport> {
    let collect_config = CollectConfig::from(config);
    let collect_report = collect(&collect_config, run_date, progress).await?;

    progress.phase("Processing articles");
    let mut merge_config = MergeConfig::from(config);
    merge_config.database_in = collect_config.index_output.clone();

    let process_report = process(&ProcessConfig {
        input: collect_config.raw_output.clone(),
        output: merge_config.contents_in.clone(),
        run_date,
        digest: DigestConfig::from(config),
    })?;

    progress.phase("Merging into stores");
    let merge_summary = merge(&merge_config)?;

    let report = RunReport {
        collect: collect_report,
        process: process_report,
        merge: merge_summary,
    };
    progress.done(&report);
    Ok(report)
}
