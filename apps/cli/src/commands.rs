//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use newsdigest_core::pipeline::{
    self, CollectReport, MergeSummary, ProcessConfig, ProgressReporter, RunReport,
};
use newsdigest_shared::{
    AppConfig, CollectConfig, DigestConfig, MergeConfig, RenderConfig, init_config,
    init_config_at, load_config, load_config_from, validate_config,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// newsdigest: turn daily tech news into summaries and study questions.
#[derive(Parser)]
#[command(
    name = "newsdigest",
    version,
    about = "Collect tech news, add summaries and questions, and keep a deduplicated archive.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.newsdigest/newsdigest.toml).
    #[arg(long, global = true, env = "NEWSDIGEST_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch the latest feed entries into today's index and raw batch.
    Collect {
        /// Raw article batch to write.
        #[arg(long)]
        raw_output: Option<PathBuf>,

        /// Daily index CSV to write.
        #[arg(long)]
        index_output: Option<PathBuf>,

        /// Run date (YYYY-MM-DD), defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Add summaries, topics and questions to a raw batch.
    Process {
        /// Raw article batch (defaults to collector.raw_output).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Processed batch to write (defaults to merge.contents_in).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Run date stamped on records (YYYY-MM-DD), defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        #[command(flatten)]
        digest: DigestArgs,
    },

    /// Merge today's index and documents into the long-lived stores.
    Merge {
        #[command(flatten)]
        paths: MergeArgs,

        /// Report what would be added without writing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Render the document store as a standalone HTML page.
    Render {
        /// Document store to read (defaults to merge.contents_out).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// HTML file to write.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only include the N most recent articles.
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Page title.
        #[arg(long)]
        title: Option<String>,
    },

    /// Collect, process and merge in one go.
    Run {
        /// Run date (YYYY-MM-DD), defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Report what the merge would add without writing the stores.
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        digest: DigestArgs,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Overrides for the `[digest]` section.
#[derive(Args)]
pub(crate) struct DigestArgs {
    /// Maximum summary length in characters.
    #[arg(long)]
    summary_cap: Option<usize>,

    /// Skip articles whose text is shorter than this many characters.
    #[arg(long)]
    min_source_length: Option<usize>,
}

/// Overrides for the `[merge]` section paths.
#[derive(Args)]
pub(crate) struct MergeArgs {
    /// Today's index CSV.
    #[arg(long)]
    database_in: Option<PathBuf>,

    /// Long-lived index CSV.
    #[arg(long)]
    database_out: Option<PathBuf>,

    /// Today's processed documents.
    #[arg(long)]
    contents_in: Option<PathBuf>,

    /// Long-lived document store.
    #[arg(long)]
    contents_out: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init {
        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "newsdigest=info",
        1 => "newsdigest=debug",
        _ => "newsdigest=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let load = || resolve_config(config_path);

    match cli.command {
        Command::Collect {
            raw_output,
            index_output,
            date,
        } => cmd_collect(load()?, raw_output, index_output, date).await,
        Command::Process {
            input,
            output,
            date,
            digest,
        } => cmd_process(load()?, input, output, date, digest).await,
        Command::Merge { paths, dry_run } => cmd_merge(load()?, paths, dry_run).await,
        Command::Render {
            input,
            output,
            limit,
            title,
        } => cmd_render(load()?, input, output, limit, title).await,
        Command::Run {
            date,
            dry_run,
            digest,
        } => cmd_run(load()?, date, dry_run, digest).await,
        Command::Config { action } => match action {
            ConfigAction::Init { force } => cmd_config_init(config_path, force).await,
            ConfigAction::Show => cmd_config_show(&load()?).await,
        },
    }
}

/// Load the config from `--config` when given, else from the default location.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl DigestArgs {
    fn apply(self, config: &mut AppConfig) -> Result<()> {
        if let Some(cap) = self.summary_cap {
            config.digest.summary_cap = cap;
        }
        if let Some(min) = self.min_source_length {
            config.digest.min_source_length = min;
        }
        validate_config(config)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_collect(
    config: AppConfig,
    raw_output: Option<PathBuf>,
    index_output: Option<PathBuf>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let mut collect_config = CollectConfig::from(&config);
    if let Some(path) = raw_output {
        collect_config.raw_output = path;
    }
    if let Some(path) = index_output {
        collect_config.index_output = path;
    }
    let run_date = date.unwrap_or_else(today);

    info!(feeds = collect_config.feeds.len(), %run_date, "collecting feeds");

    let reporter = CliProgress::new();
    let report = pipeline::collect(&collect_config, run_date, &reporter).await;
    reporter.finish();
    let report = report?;

    println!();
    print_collect(&report);
    println!();
    Ok(())
}

async fn cmd_process(
    mut config: AppConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    date: Option<NaiveDate>,
    digest: DigestArgs,
) -> Result<()> {
    digest.apply(&mut config)?;

    let process_config = ProcessConfig {
        input: input.unwrap_or_else(|| PathBuf::from(&config.collector.raw_output)),
        output: output.unwrap_or_else(|| PathBuf::from(&config.merge.contents_in)),
        run_date: date.unwrap_or_else(today),
        digest: DigestConfig::from(&config),
    };

    let report = pipeline::process(&process_config)?;

    println!();
    println!("  Processed {}", report.input.display());
    println!("  Read:    {}", report.read);
    println!("  Kept:    {}", report.kept);
    println!("  Skipped: {}", report.skipped);
    println!("  Output:  {}", report.output.display());
    println!();
    Ok(())
}

async fn cmd_merge(config: AppConfig, paths: MergeArgs, dry_run: bool) -> Result<()> {
    let mut merge_config = MergeConfig::from(&config);
    if let Some(path) = paths.database_in {
        merge_config.database_in = path;
    }
    if let Some(path) = paths.database_out {
        merge_config.database_out = path;
    }
    if let Some(path) = paths.contents_in {
        merge_config.contents_in = path;
    }
    if let Some(path) = paths.contents_out {
        merge_config.contents_out = path;
    }
    merge_config.dry_run |= dry_run;

    let summary = pipeline::merge(&merge_config)?;

    println!();
    print_merge(&summary);
    println!();
    Ok(())
}

async fn cmd_render(
    config: AppConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    limit: Option<usize>,
    title: Option<String>,
) -> Result<()> {
    let mut render_config = RenderConfig::from(&config);
    if let Some(path) = input {
        render_config.input = path;
    }
    if let Some(path) = output {
        render_config.output = path;
    }
    if limit.is_some() {
        render_config.limit = limit;
    }
    if let Some(title) = title {
        render_config.title = title;
    }

    let report = pipeline::render(&render_config, Local::now().naive_local())?;

    println!();
    println!(
        "  Rendered {} of {} articles to {}",
        report.rendered,
        report.total,
        report.output.display()
    );
    println!();
    Ok(())
}

async fn cmd_run(
    mut config: AppConfig,
    date: Option<NaiveDate>,
    dry_run: bool,
    digest: DigestArgs,
) -> Result<()> {
    digest.apply(&mut config)?;
    config.merge.dry_run |= dry_run;
    let run_date = date.unwrap_or_else(today);

    info!(%run_date, dry_run = config.merge.dry_run, "starting daily run");

    let reporter = CliProgress::new();
    let result = pipeline::run_daily(&config, run_date, &reporter).await;
    reporter.finish();
    let report = result?;

    println!();
    print_collect(&report.collect);
    println!(
        "  Processed: {} kept, {} skipped",
        report.process.kept, report.process.skipped
    );
    print_merge(&report.merge);
    println!();
    Ok(())
}

async fn cmd_config_init(path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => init_config_at(path, force)?,
        None => init_config(force)?,
    };
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_collect(report: &CollectReport) {
    println!(
        "  Collected: {} articles, {} index rows",
        report.articles, report.index_rows
    );
    println!("  Index:     {}", report.index_output.display());
    println!("  Raw batch: {}", report.raw_output.display());
    for failure in &report.failures {
        match &failure.url {
            Some(url) => println!("  Failed:    {} ({url}): {}", failure.feed, failure.error),
            None => println!("  Failed:    {}: {}", failure.feed, failure.error),
        }
    }
}

fn print_merge(summary: &MergeSummary) {
    for (label, report) in [("Index", &summary.index), ("Documents", &summary.documents)] {
        let action = match (report.written, report.dry_run) {
            (true, _) => "written",
            (false, true) => "dry run, not written",
            (false, false) => "unchanged",
        };
        println!(
            "  {label:<10} {} existing, {} incoming, {} added -> {} ({action})",
            report.existing,
            report.incoming,
            report.added,
            report.store.display()
        );
    }
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .expect("valid progress template")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn feed_collected(&self, feed: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Collected [{current}/{total}] {feed}"));
    }

    fn done(&self, _report: &RunReport) {
        self.spinner.finish_and_clear();
    }
}
