//! Core types for tvstat-core.
//!
//! This module defines the data structures shared across the parsing layers:
//! the transient [`RawBlock`] and [`MetricSet`], the typed
//! [`ExecutionRecord`], and the [`Classification`] a caller attaches to each
//! input file.

use std::collections::BTreeMap;

/// Literal that opens every report emitted by `/usr/bin/time -v`.
pub const BLOCK_DELIMITER: &str = "Command being timed:";

/// Output format for timestamps synthesized from a group's base time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// RawBlock
// ---------------------------------------------------------------------------

/// The text of one timed execution, as cut out of a log file by the segmenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    /// Block text with the delimiter reattached, so it parses on its own.
    pub text: String,
    /// File name the block came from.
    pub source: String,
    /// 0-based position among the kept blocks of `source`.
    pub index: usize,
    /// The quoted command line following the delimiter, if any.
    pub command: Option<String>,
    /// Whether `command` matched the category's command pattern. `None` when
    /// no pattern was supplied or the block has no command line.
    pub command_matches: Option<bool>,
}

impl RawBlock {
    /// 1-based execution sequence number within the source file.
    pub fn sequence(&self) -> u32 {
        u32::try_from(self.index + 1).unwrap_or(u32::MAX)
    }
}

// ---------------------------------------------------------------------------
// MetricKey / MetricSet
// ---------------------------------------------------------------------------

/// Every metric the extractor knows how to capture from a report block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricKey {
    MaxRssKb,
    UserTimeSec,
    SystemTimeSec,
    CpuPercent,
    ElapsedTime,
    MinorPageFaults,
    MajorPageFaults,
    VoluntaryContextSwitches,
    InvoluntaryContextSwitches,
    FileSystemInputs,
    FileSystemOutputs,
    SocketMessagesSent,
    SocketMessagesReceived,
    SignalsDelivered,
    PageSizeBytes,
    ExitStatus,
}

impl MetricKey {
    pub const ALL: [MetricKey; 16] = [
        MetricKey::MaxRssKb,
        MetricKey::UserTimeSec,
        MetricKey::SystemTimeSec,
        MetricKey::CpuPercent,
        MetricKey::ElapsedTime,
        MetricKey::MinorPageFaults,
        MetricKey::MajorPageFaults,
        MetricKey::VoluntaryContextSwitches,
        MetricKey::InvoluntaryContextSwitches,
        MetricKey::FileSystemInputs,
        MetricKey::FileSystemOutputs,
        MetricKey::SocketMessagesSent,
        MetricKey::SocketMessagesReceived,
        MetricKey::SignalsDelivered,
        MetricKey::PageSizeBytes,
        MetricKey::ExitStatus,
    ];

    /// Column name used for this metric in output tables.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::MaxRssKb => "max_rss_kb",
            MetricKey::UserTimeSec => "user_time_sec",
            MetricKey::SystemTimeSec => "system_time_sec",
            MetricKey::CpuPercent => "cpu_percent",
            MetricKey::ElapsedTime => "elapsed_time",
            MetricKey::MinorPageFaults => "minor_page_faults",
            MetricKey::MajorPageFaults => "major_page_faults",
            MetricKey::VoluntaryContextSwitches => "voluntary_context_switches",
            MetricKey::InvoluntaryContextSwitches => "involuntary_context_switches",
            MetricKey::FileSystemInputs => "file_system_inputs",
            MetricKey::FileSystemOutputs => "file_system_outputs",
            MetricKey::SocketMessagesSent => "socket_messages_sent",
            MetricKey::SocketMessagesReceived => "socket_messages_received",
            MetricKey::SignalsDelivered => "signals_delivered",
            MetricKey::PageSizeBytes => "page_size_bytes",
            MetricKey::ExitStatus => "exit_status",
        }
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw captures for one block, keyed by metric.
///
/// A key is absent when its pattern did not match. The typed accessors never
/// fail: absent or unparsable values read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricSet {
    values: BTreeMap<MetricKey, String>,
    /// First `YYYY/MM/DD HH:MM:SS` timestamp found in the block, verbatim.
    pub timestamp: Option<String>,
}

impl MetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: MetricKey, raw: impl Into<String>) {
        self.values.insert(key, raw.into());
    }

    pub fn get(&self, key: MetricKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: MetricKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Integer reading of `key`; zero when absent or malformed.
    pub fn integer(&self, key: MetricKey) -> u64 {
        match self.get(key) {
            None => 0,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::debug!(metric = %key, raw, "malformed integer capture, using 0");
                0
            }),
        }
    }

    /// Decimal reading of `key`; zero when absent, malformed or non-finite.
    pub fn decimal(&self, key: MetricKey) -> f64 {
        match self.get(key) {
            None => 0.0,
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    tracing::debug!(metric = %key, raw, "malformed decimal capture, using 0");
                    0.0
                }
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// When an execution ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    /// Found in the block text; kept exactly as written.
    Observed(String),
    /// Derived from the group base time plus one hour per preceding execution.
    /// Assumes an hourly cadence that the log itself does not guarantee.
    Synthesized(chrono::NaiveDateTime),
}

impl Timestamp {
    pub fn is_synthesized(&self) -> bool {
        matches!(self, Timestamp::Synthesized(_))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timestamp::Observed(raw) => f.write_str(raw),
            Timestamp::Synthesized(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

// ---------------------------------------------------------------------------
// ExecutionRecord
// ---------------------------------------------------------------------------

/// One normalised execution: the typed raw metrics of a block plus derived
/// efficiency fields. Never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRecord {
    /// 1-based position within the source file.
    pub execution_id: u32,
    pub timestamp: Timestamp,
    /// Grouping label (day or session).
    pub group: String,
    /// Monitored program that produced the run.
    pub category: String,

    pub max_rss_kb: u64,
    pub elapsed_sec: f64,
    pub user_time_sec: f64,
    pub system_time_sec: f64,
    pub cpu_percent: u64,
    pub minor_page_faults: u64,
    pub major_page_faults: u64,
    pub voluntary_context_switches: u64,
    pub involuntary_context_switches: u64,
    pub file_system_inputs: u64,
    pub file_system_outputs: u64,
    pub socket_messages_sent: u64,
    pub socket_messages_received: u64,
    pub signals_delivered: u64,
    pub page_size_bytes: u64,
    pub exit_status: u64,

    pub max_rss_mb: f64,
    /// Kilobytes of peak memory per second of wall time.
    pub efficiency_ratio: f64,
    /// Higher is better; inversely proportional to peak memory.
    pub memory_efficiency_score: f64,
    /// Composite 0–100 score rewarding low memory, CPU and latency.
    pub performance_score: f64,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// How a classification value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Supplied by the caller.
    Explicit,
    /// Matched a token in the file name.
    Inferred,
    /// No token matched; the configured fallback was used.
    Defaulted,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Explicit => write!(f, "explicit"),
            Origin::Inferred => write!(f, "inferred"),
            Origin::Defaulted => write!(f, "defaulted"),
        }
    }
}

/// A classification value together with its [`Origin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub origin: Origin,
}

impl Resolved {
    pub fn explicit(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            origin: Origin::Explicit,
        }
    }

    pub fn inferred(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            origin: Origin::Inferred,
        }
    }

    pub fn defaulted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            origin: Origin::Defaulted,
        }
    }
}

/// Category and group of an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: Resolved,
    pub group: Resolved,
}

impl Classification {
    pub fn explicit(category: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            category: Resolved::explicit(category),
            group: Resolved::explicit(group),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_set_reads_zero_for_absent_and_malformed() {
        let mut set = MetricSet::new();
        set.insert(MetricKey::MaxRssKb, "12x");
        set.insert(MetricKey::UserTimeSec, "0.25");
        assert_eq!(set.integer(MetricKey::MaxRssKb), 0);
        assert_eq!(set.integer(MetricKey::ExitStatus), 0);
        assert_eq!(set.decimal(MetricKey::UserTimeSec), 0.25);
        assert_eq!(set.decimal(MetricKey::SystemTimeSec), 0.0);
    }

    #[test]
    fn synthesized_timestamp_formats_with_dashes() {
        let ts = chrono::NaiveDate::from_ymd_opt(2026, 2, 5)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .unwrap();
        assert_eq!(Timestamp::Synthesized(ts).to_string(), "2026-02-05 09:00:00");
        assert_eq!(
            Timestamp::Observed("2026/02/05 09:00:01".into()).to_string(),
            "2026/02/05 09:00:01"
        );
    }

    #[test]
    fn metric_keys_have_unique_names() {
        let names: std::collections::HashSet<_> =
            MetricKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names.len(), MetricKey::ALL.len());
    }
}
