//! Field extractor — applies the metric pattern table to a [`RawBlock`].
//!
//! The table maps each [`MetricKey`] to the label text `time -v` prints in
//! front of it and the shape of the value that follows. Extraction is purely
//! data-driven: adding a metric means adding a row, not a branch.

use regex::Regex;

use crate::types::{MetricKey, MetricSet, RawBlock};

/// Shape of a captured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Non-negative whole number.
    Integer,
    /// Decimal seconds, e.g. `0.25`.
    Decimal,
    /// Whole number followed by `%`; the `%` is not captured.
    Percent,
    /// `H:MM:SS[.ss]` or `M:SS[.ss]`, captured verbatim.
    Clock,
}

impl ValueKind {
    fn capture(self) -> &'static str {
        match self {
            ValueKind::Integer => r"(\d+)",
            ValueKind::Decimal => r"([\d.]+)",
            ValueKind::Percent => r"(\d+)%",
            ValueKind::Clock => r"([\d:.]+)",
        }
    }
}

/// One row of the pattern table.
#[derive(Debug, Clone, Copy)]
pub struct MetricPattern {
    pub key: MetricKey,
    /// Label exactly as printed by `time -v`, without the trailing colon.
    pub label: &'static str,
    pub kind: ValueKind,
}

const fn metric(key: MetricKey, label: &'static str, kind: ValueKind) -> MetricPattern {
    MetricPattern { key, label, kind }
}

/// Label text and value shape for every metric key.
pub const METRIC_PATTERNS: &[MetricPattern] = &[
    metric(MetricKey::MaxRssKb, "Maximum resident set size (kbytes)", ValueKind::Integer),
    metric(MetricKey::UserTimeSec, "User time (seconds)", ValueKind::Decimal),
    metric(MetricKey::SystemTimeSec, "System time (seconds)", ValueKind::Decimal),
    metric(MetricKey::CpuPercent, "Percent of CPU this job got", ValueKind::Percent),
    metric(MetricKey::ElapsedTime, "Elapsed (wall clock) time (h:mm:ss or m:ss)", ValueKind::Clock),
    metric(MetricKey::MinorPageFaults, "Minor (reclaiming a frame) page faults", ValueKind::Integer),
    metric(MetricKey::MajorPageFaults, "Major (requiring I/O) page faults", ValueKind::Integer),
    metric(MetricKey::VoluntaryContextSwitches, "Voluntary context switches", ValueKind::Integer),
    metric(MetricKey::InvoluntaryContextSwitches, "Involuntary context switches", ValueKind::Integer),
    metric(MetricKey::FileSystemInputs, "File system inputs", ValueKind::Integer),
    metric(MetricKey::FileSystemOutputs, "File system outputs", ValueKind::Integer),
    metric(MetricKey::SocketMessagesSent, "Socket messages sent", ValueKind::Integer),
    metric(MetricKey::SocketMessagesReceived, "Socket messages received", ValueKind::Integer),
    metric(MetricKey::SignalsDelivered, "Signals delivered", ValueKind::Integer),
    metric(MetricKey::PageSizeBytes, "Page size (bytes)", ValueKind::Integer),
    metric(MetricKey::ExitStatus, "Exit status", ValueKind::Integer),
];

const LOG_TIMESTAMP: &str = r"(\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2})";

/// Compiled pattern table. Build once and reuse for every block.
#[derive(Debug, Clone)]
pub struct Extractor {
    patterns: Vec<(MetricKey, Regex)>,
    timestamp: Regex,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        let patterns = METRIC_PATTERNS
            .iter()
            .map(|p| {
                let source = format!(r"{}:\s+{}", regex::escape(p.label), p.kind.capture());
                let re = Regex::new(&source).expect("built-in metric pattern must compile");
                (p.key, re)
            })
            .collect();
        Self {
            patterns,
            timestamp: Regex::new(LOG_TIMESTAMP).expect("built-in timestamp pattern must compile"),
        }
    }

    /// Capture every metric present in `block`. Missing labels are simply
    /// absent from the result; this never fails.
    pub fn extract(&self, block: &RawBlock) -> MetricSet {
        self.extract_text(&block.text)
    }

    /// Same as [`Extractor::extract`] over bare text.
    pub fn extract_text(&self, text: &str) -> MetricSet {
        let mut set = MetricSet::new();
        for (key, re) in &self.patterns {
            if let Some(value) = re.captures(text).and_then(|c| c.get(1)) {
                set.insert(*key, value.as_str());
            }
        }
        set.timestamp = self
            .timestamp
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());
        set
    }
}
