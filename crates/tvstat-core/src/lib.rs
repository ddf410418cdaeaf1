//! tvstat-core — parsing and aggregation layers for `/usr/bin/time -v` logs.
//!
//! # Architecture
//!
//! ```text
//! text ──► Segmenter ──► Extractor ──► Normalizer ──► Aggregator
//!           RawBlock      MetricSet    ExecutionRecord  GroupSummary
//! ```
//!
//! Everything is synchronous and single-pass. [`pipeline::Pipeline`] drives the
//! layers one input at a time; a failing input is logged and skipped without
//! affecting the others.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod extractor;
pub mod normalizer;
pub mod pipeline;
pub mod segmenter;
pub mod types;

pub use aggregator::{CategorySummary, Comparison, GroupSummary, Stats};
pub use config::Config;
pub use error::PipelineError;
pub use pipeline::{LogSource, Pipeline, RunOutcome, TextSource};
pub use types::{Classification, ExecutionRecord, MetricKey, MetricSet, Origin, RawBlock, Resolved, Timestamp};
