//! Configuration types for tvstat.
//!
//! [`Config::load`] layers an optional user file (`--config PATH`, or
//! `~/.config/tvstat/config.toml` when present) over the embedded defaults.
//! [`Config::defaults`] returns the same defaults without touching the
//! filesystem (useful in tests).

use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::types::TIMESTAMP_FORMAT;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[input]
dir      = "benchmark-results/raw-logs"
patterns = ["bench_go_day*.log", "bench_py_day*.log", "bench_go.log", "bench_py.log"]

[output]
dir          = "benchmark-results/analysis"
summary_file = "combined_summary.csv"
report_file  = "summary_report.txt"

[parsing]
min_block_lines   = 6
default_group     = "day1"
default_base_time = "2026-02-05 07:00:00"

[comparison]
baseline  = "python"
candidate = "golang"

[scoring]
efficiency_constant = 1000000.0
memory_baseline_kb  = 1024.0
memory_weight       = 0.4
cpu_weight          = 0.3
latency_weight      = 0.3
latency_cap_secs    = 60.0

[[categories]]
name            = "golang"
prefix          = "go"
tokens          = ["golang", "go_"]
command_pattern = '"\./monitor-app --log"'
output          = "golang_metrics.csv"

[[categories]]
name            = "python"
prefix          = "py"
tokens          = ["python", "py_"]
command_pattern = '"/opt/monitoring/env/bin/python3.*monitor_server\.py --log"'
output          = "python_metrics.csv"

[[groups]]
label     = "day1"
tokens    = ["day1"]
base_time = "2026-02-05 07:00:00"

[[groups]]
label     = "day2"
tokens    = ["day2"]
base_time = "2026-02-06 07:00:00"

[[groups]]
label     = "day3"
tokens    = ["day3"]
base_time = "2026-02-07 07:00:00"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub parsing: ParsingConfig,
    #[serde(default)]
    pub comparison: ComparisonConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

/// `[input]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_input_dir")]
    pub dir: PathBuf,
    /// Glob patterns matched against file names inside `dir`.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
}

fn default_input_dir() -> PathBuf { PathBuf::from("benchmark-results/raw-logs") }
fn default_patterns() -> Vec<String> { vec!["*.log".to_string()] }

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: default_input_dir(),
            patterns: default_patterns(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_summary_file")]
    pub summary_file: String,
    #[serde(default = "default_report_file")]
    pub report_file: String,
}

fn default_output_dir() -> PathBuf { PathBuf::from("benchmark-results/analysis") }
fn default_summary_file() -> String { "combined_summary.csv".to_string() }
fn default_report_file() -> String { "summary_report.txt".to_string() }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            summary_file: default_summary_file(),
            report_file: default_report_file(),
        }
    }
}

/// `[parsing]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsingConfig {
    /// Blocks with fewer lines than this are treated as truncated and dropped.
    #[serde(default = "default_min_block_lines")]
    pub min_block_lines: usize,
    /// Group used when no group token matches a file name.
    #[serde(default = "default_group")]
    pub default_group: String,
    /// Base time for groups without a configured `base_time`.
    #[serde(default = "default_base_time")]
    pub default_base_time: String,
    /// Category used when no category token matches. Files are skipped when
    /// this is unset.
    #[serde(default)]
    pub default_category: Option<String>,
}

fn default_min_block_lines() -> usize { 6 }
fn default_group() -> String { "day1".to_string() }
fn default_base_time() -> String { "2026-02-05 07:00:00".to_string() }

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            min_block_lines: default_min_block_lines(),
            default_group: default_group(),
            default_base_time: default_base_time(),
            default_category: None,
        }
    }
}

/// `[comparison]` section: which two categories the summary compares.
/// Ratios read "baseline relative to candidate".
#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonConfig {
    #[serde(default = "default_baseline")]
    pub baseline: String,
    #[serde(default = "default_candidate")]
    pub candidate: String,
}

fn default_baseline() -> String { "python".to_string() }
fn default_candidate() -> String { "golang".to_string() }

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            baseline: default_baseline(),
            candidate: default_candidate(),
        }
    }
}

/// `[scoring]` section: policy constants behind the derived metrics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_efficiency_constant")]
    pub efficiency_constant: f64,
    /// Peak memory (KB) that earns the full memory term.
    #[serde(default = "default_memory_baseline_kb")]
    pub memory_baseline_kb: f64,
    #[serde(default = "default_memory_weight")]
    pub memory_weight: f64,
    #[serde(default = "default_cpu_weight")]
    pub cpu_weight: f64,
    #[serde(default = "default_latency_weight")]
    pub latency_weight: f64,
    /// Elapsed seconds beyond this no longer lower the latency term.
    #[serde(default = "default_latency_cap_secs")]
    pub latency_cap_secs: f64,
}

fn default_efficiency_constant() -> f64 { 1_000_000.0 }
fn default_memory_baseline_kb() -> f64 { 1024.0 }
fn default_memory_weight() -> f64 { 0.4 }
fn default_cpu_weight() -> f64 { 0.3 }
fn default_latency_weight() -> f64 { 0.3 }
fn default_latency_cap_secs() -> f64 { 60.0 }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            efficiency_constant: default_efficiency_constant(),
            memory_baseline_kb: default_memory_baseline_kb(),
            memory_weight: default_memory_weight(),
            cpu_weight: default_cpu_weight(),
            latency_weight: default_latency_weight(),
            latency_cap_secs: default_latency_cap_secs(),
        }
    }
}

/// One `[[categories]]` entry: a monitored program.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    /// Column prefix in the combined summary (`go` → `go_measurements`).
    pub prefix: String,
    /// Case-insensitive file name substrings that select this category.
    #[serde(default)]
    pub tokens: Vec<String>,
    /// Regex the block's command line is expected to match.
    #[serde(default)]
    pub command_pattern: Option<String>,
    /// Per-category CSV file name.
    pub output: String,
}

/// One `[[groups]]` entry: a day or session.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupConfig {
    pub label: String,
    #[serde(default)]
    pub tokens: Vec<String>,
    /// `YYYY-MM-DD HH:MM:SS` time of the group's first execution.
    #[serde(default)]
    pub base_time: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load `path` (or the user config file, if one exists) layered on top of
    /// the built-in defaults, then validate the result.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));

        match path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                let user = config_path();
                builder = builder.add_source(config::File::from(user.as_path()).required(false));
            }
        }

        let cfg: Config = builder
            .build()
            .context("reading configuration")?
            .try_deserialize()
            .context("deserializing configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Layer a TOML string over the built-in defaults.
    pub fn from_toml(toml: &str) -> anyhow::Result<Self> {
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.categories.is_empty() {
            bail!("at least one [[categories]] entry is required");
        }
        for cat in &self.categories {
            if let Some(pattern) = &cat.command_pattern {
                regex::Regex::new(pattern).with_context(|| {
                    format!("category {:?}: invalid command_pattern", cat.name)
                })?;
            }
        }
        for name in [&self.comparison.baseline, &self.comparison.candidate] {
            if self.category(name).is_none() {
                bail!("[comparison] names unknown category {name:?}");
            }
        }
        if let Some(name) = &self.parsing.default_category {
            if self.category(name).is_none() {
                bail!("[parsing] default_category names unknown category {name:?}");
            }
        }
        parse_base_time(&self.parsing.default_base_time)
            .context("[parsing] default_base_time")?;
        for group in &self.groups {
            if let Some(raw) = &group.base_time {
                parse_base_time(raw)
                    .with_context(|| format!("group {:?}: base_time", group.label))?;
            }
        }
        let s = &self.scoring;
        let weights = [s.memory_weight, s.cpu_weight, s.latency_weight];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            bail!("[scoring] weights must be finite and non-negative");
        }
        if s.efficiency_constant < 0.0 || s.memory_baseline_kb < 0.0 || s.latency_cap_secs < 0.0 {
            bail!("[scoring] constants must be non-negative");
        }
        Ok(())
    }

    /// Look up a category by name.
    pub fn category(&self, name: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Look up a group by label.
    pub fn group(&self, label: &str) -> Option<&GroupConfig> {
        self.groups.iter().find(|g| g.label == label)
    }

    /// Time of the first execution in `label`. Unknown groups and groups
    /// without a `base_time` fall back to `[parsing] default_base_time`.
    pub fn base_time(&self, label: &str) -> NaiveDateTime {
        self.group(label)
            .and_then(|g| g.base_time.as_deref())
            .and_then(|raw| parse_base_time(raw).ok())
            .or_else(|| parse_base_time(&self.parsing.default_base_time).ok())
            .unwrap_or_default()
    }
}

fn parse_base_time(raw: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
        .with_context(|| format!("expected YYYY-MM-DD HH:MM:SS, got {raw:?}"))
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("tvstat")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
