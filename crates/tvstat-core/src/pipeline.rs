//! Pipeline — drives segment → extract → normalise per input, then aggregates.
//!
//! Each input is its own failure boundary: a read error or an unknown
//! category is logged, recorded in [`RunOutcome::skipped`], and the run
//! continues with the next input.

use std::collections::HashMap;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::aggregator::{aggregate, GroupSummary};
use crate::config::Config;
use crate::error::PipelineError;
use crate::extractor::Extractor;
use crate::normalizer::{normalize, RecordContext};
use crate::segmenter::segment;
use crate::types::{Classification, ExecutionRecord, Origin};

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Something the pipeline can read one log from.
pub trait LogSource {
    /// Display name, usually the file name.
    fn name(&self) -> &str;
    fn classification(&self) -> &Classification;
    /// Full text of the log.
    fn read(&self) -> std::io::Result<String>;
}

/// An in-memory log, for callers that already hold the text.
#[derive(Debug, Clone)]
pub struct TextSource {
    pub name: String,
    pub classification: Classification,
    pub text: String,
}

impl TextSource {
    pub fn new(name: impl Into<String>, classification: Classification, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classification,
            text: text.into(),
        }
    }
}

impl LogSource for TextSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn classification(&self) -> &Classification {
        &self.classification
    }

    fn read(&self) -> std::io::Result<String> {
        Ok(self.text.clone())
    }
}

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// What happened to one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub name: String,
    pub category: String,
    pub group: String,
    /// Records produced (one per kept block).
    pub measurements: usize,
    /// Records whose timestamp was synthesized from the group base time.
    pub synthesized_timestamps: usize,
    /// Blocks whose command line did not match the category's pattern.
    pub command_mismatches: usize,
}

/// An input that produced nothing because it failed as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub name: String,
    pub reason: String,
}

/// Records of one category, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRecords {
    pub category: String,
    /// Output file name from the category config.
    pub output: String,
    pub records: Vec<ExecutionRecord>,
}

/// Everything a run produced, ready for the sink.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// One entry per configured category, in configuration order.
    pub categories: Vec<CategoryRecords>,
    pub summaries: Vec<GroupSummary>,
    pub files: Vec<FileReport>,
    pub skipped: Vec<SkippedFile>,
}

impl RunOutcome {
    pub fn total_records(&self) -> usize {
        self.categories.iter().map(|c| c.records.len()).sum()
    }

    pub fn records(&self, category: &str) -> &[ExecutionRecord] {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.records.as_slice())
            .unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

pub struct Pipeline {
    config: Config,
    extractor: Extractor,
    command_patterns: HashMap<String, Regex>,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self, PipelineError> {
        let mut command_patterns = HashMap::new();
        for cat in &config.categories {
            if let Some(pattern) = &cat.command_pattern {
                let re = Regex::new(pattern).map_err(|source| PipelineError::CommandPattern {
                    category: cat.name.clone(),
                    source,
                })?;
                command_patterns.insert(cat.name.clone(), re);
            }
        }
        Ok(Self {
            config,
            extractor: Extractor::new(),
            command_patterns,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse one log's text into records.
    pub fn process_text(
        &self,
        text: &str,
        name: &str,
        classification: &Classification,
    ) -> Result<(FileReport, Vec<ExecutionRecord>), PipelineError> {
        let category = classification.category.value.as_str();
        let group = classification.group.value.as_str();
        if self.config.category(category).is_none() {
            return Err(PipelineError::UnknownCategory {
                name: name.to_string(),
                category: category.to_string(),
            });
        }
        if classification.group.origin == Origin::Defaulted {
            warn!(file = name, group, "no group token in file name, using default group");
        }
        if classification.category.origin == Origin::Defaulted {
            warn!(file = name, category, "no category token in file name, using default category");
        }

        let base_time = self.config.base_time(group);
        let pattern = self.command_patterns.get(category);
        let mut report = FileReport {
            name: name.to_string(),
            category: category.to_string(),
            group: group.to_string(),
            measurements: 0,
            synthesized_timestamps: 0,
            command_mismatches: 0,
        };

        let records: Vec<ExecutionRecord> = segment(text, name, self.config.parsing.min_block_lines, pattern)
            .map(|block| {
                if block.command_matches == Some(false) {
                    report.command_mismatches += 1;
                    debug!(file = name, block = block.sequence(), command = ?block.command, "command does not match category pattern");
                }
                let metrics = self.extractor.extract(&block);
                let ctx = RecordContext {
                    execution_id: block.sequence(),
                    category,
                    group,
                    base_time,
                };
                normalize(&metrics, &ctx, &self.config.scoring)
            })
            .collect();

        report.measurements = records.len();
        report.synthesized_timestamps = records.iter().filter(|r| r.timestamp.is_synthesized()).count();

        if records.is_empty() {
            info!(file = name, category, "no execution blocks found");
        } else {
            info!(file = name, category, group, measurements = records.len(), "parsed log");
        }
        if report.synthesized_timestamps > 0 {
            warn!(
                file = name,
                count = report.synthesized_timestamps,
                base = %base_time,
                "timestamps synthesized assuming one execution per hour"
            );
        }
        if report.command_mismatches > 0 {
            warn!(
                file = name,
                category,
                count = report.command_mismatches,
                "blocks with a command line not matching the category; file may be misnamed"
            );
        }
        Ok((report, records))
    }

    /// Read and parse one source.
    pub fn process(&self, source: &dyn LogSource) -> Result<(FileReport, Vec<ExecutionRecord>), PipelineError> {
        let text = source.read().map_err(|e| PipelineError::Read {
            name: source.name().to_string(),
            source: e,
        })?;
        self.process_text(&text, source.name(), source.classification())
    }

    /// Process every source in order and aggregate the result.
    pub fn run<S: LogSource>(&self, sources: &[S]) -> RunOutcome {
        let mut files = Vec::new();
        let mut skipped = Vec::new();
        let mut all = Vec::new();

        for source in sources {
            match self.process(source) {
                Ok((report, records)) => {
                    files.push(report);
                    all.extend(records);
                }
                Err(err) => {
                    warn!(file = source.name(), error = %err, "skipping input");
                    skipped.push(SkippedFile {
                        name: source.name().to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let summaries = aggregate(&all, &self.config.categories, &self.config.comparison);

        let categories = self
            .config
            .categories
            .iter()
            .map(|cat| CategoryRecords {
                category: cat.name.clone(),
                output: cat.output.clone(),
                records: all.iter().filter(|r| r.category == cat.name).cloned().collect(),
            })
            .collect();

        RunOutcome {
            categories,
            summaries,
            files,
            skipped,
        }
    }
}
