//! tvstat — summarise `/usr/bin/time -v` resource reports.
//!
//! This crate wires the workspace layers together for the binary and the
//! integration tests:
//!
//! ```text
//! feeds (discover, classify, read) ──► core (segment, extract,
//! normalise, aggregate) ──► sink (CSV tables, text report)
//! ```
//!
//! Everything runs synchronously in one pass; a run is a batch job.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Serialize;
use tracing::{info, warn};

use tvstat_core::pipeline::SkippedFile;
use tvstat_core::{Classification, Config, Pipeline, RunOutcome};
use tvstat_feeds::{classify, discover, LogFile};

/// Category and group forced onto every input, bypassing file name inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub category: String,
    pub group: String,
}

/// Everything one invocation needs beyond the configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overrides `[input] dir`.
    pub input: Option<PathBuf>,
    /// Overrides `[output] dir`.
    pub output: Option<PathBuf>,
    /// Explicit inputs; when empty, inputs are discovered in the input dir.
    pub files: Vec<PathBuf>,
    pub classification: Option<Override>,
    /// Also write the text report.
    pub report: bool,
}

/// Machine-readable account of a run, printed by `--json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub files: Vec<FileSummary>,
    /// Records per category, including categories with none.
    pub records: BTreeMap<String, usize>,
    pub groups: Vec<String>,
    pub outputs: Vec<OutputSummary>,
    pub skipped: Vec<SkippedSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub name: String,
    pub category: String,
    pub group: String,
    pub measurements: usize,
    pub synthesized_timestamps: usize,
    pub command_mismatches: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSummary {
    pub path: PathBuf,
    /// Data rows; absent for the text report.
    pub rows: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSummary {
    pub name: String,
    pub reason: String,
}

/// Resolve inputs, run the pipeline and write every output.
pub fn run(config: &Config, opts: &RunOptions) -> anyhow::Result<RunSummary> {
    if let Some(o) = &opts.classification {
        if config.category(&o.category).is_none() {
            bail!("unknown category {:?}", o.category);
        }
    }

    let paths = if opts.files.is_empty() {
        let dir = opts.input.as_deref().unwrap_or(config.input.dir.as_path());
        let found = discover(dir, &config.input.patterns)
            .with_context(|| format!("discovering logs in {}", dir.display()))?;
        info!(dir = %dir.display(), files = found.len(), "discovered log files");
        found
    } else {
        opts.files.clone()
    };

    let (sources, unclassified) = classify_all(&paths, config, opts.classification.as_ref());
    let pipeline = Pipeline::new(config.clone())?;
    let mut outcome = pipeline.run(&sources);
    outcome.skipped.extend(unclassified);

    if outcome.total_records() == 0 {
        info!("no execution records in any input");
    }

    let out_dir = opts.output.as_deref().unwrap_or(config.output.dir.as_path());
    let mut outputs: Vec<OutputSummary> = tvstat_sink::write_outputs(&outcome, config, out_dir)?
        .into_iter()
        .map(|t| OutputSummary {
            path: t.path,
            rows: Some(t.rows),
        })
        .collect();

    if opts.report {
        outputs.push(write_report(&outcome, config, out_dir)?);
    }

    Ok(summarize(&outcome, outputs))
}

fn classify_all(
    paths: &[PathBuf],
    config: &Config,
    forced: Option<&Override>,
) -> (Vec<LogFile>, Vec<SkippedFile>) {
    let mut sources = Vec::with_capacity(paths.len());
    let mut skipped = Vec::new();
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let classification = match forced {
            Some(o) => Ok(Classification::explicit(o.category.as_str(), o.group.as_str())),
            None => classify(&name, config),
        };
        match classification {
            Ok(c) => sources.push(LogFile::new(path.clone(), c)),
            Err(err) => {
                warn!(file = %name, error = %err, "skipping file");
                skipped.push(SkippedFile {
                    name,
                    reason: err.to_string(),
                });
            }
        }
    }
    (sources, skipped)
}

fn write_report(outcome: &RunOutcome, config: &Config, dir: &Path) -> anyhow::Result<OutputSummary> {
    let path = dir.join(&config.output.report_file);
    let text = tvstat_sink::report::render(outcome, config);
    std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "wrote text report");
    Ok(OutputSummary { path, rows: None })
}

fn summarize(outcome: &RunOutcome, outputs: Vec<OutputSummary>) -> RunSummary {
    RunSummary {
        files: outcome
            .files
            .iter()
            .map(|f| FileSummary {
                name: f.name.clone(),
                category: f.category.clone(),
                group: f.group.clone(),
                measurements: f.measurements,
                synthesized_timestamps: f.synthesized_timestamps,
                command_mismatches: f.command_mismatches,
            })
            .collect(),
        records: outcome
            .categories
            .iter()
            .map(|c| (c.category.clone(), c.records.len()))
            .collect(),
        groups: outcome.summaries.iter().map(|s| s.group.clone()).collect(),
        outputs,
        skipped: outcome
            .skipped
            .iter()
            .map(|s| SkippedSummary {
                name: s.name.clone(),
                reason: s.reason.clone(),
            })
            .collect(),
    }
}
