//! Pipeline orchestration for newsdigest.
//!
//! [`record`] turns raw articles into processed ones; [`pipeline`] wires the
//! collector, record builder, stores and renderer into the CLI's workflows.

pub mod pipeline;
pub mod record;

pub use pipeline::{
    CollectReport, MergeSummary, ProcessConfig, ProcessReport, ProgressReporter, RenderReport,
    RunReport, SilentProgress, collect, merge, process, render, run_daily,
};
pub use record::{BuiltBatch, RecordBuilder};
