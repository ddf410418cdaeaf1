//! Normalizer — turns a [`MetricSet`] into a typed [`ExecutionRecord`].
//!
//! Raw captures are converted with zero-on-failure semantics and the derived
//! efficiency fields are computed with guarded denominators, so
//! normalisation cannot fail.

use chrono::{Duration, NaiveDateTime};

use crate::config::ScoringConfig;
use crate::types::{ExecutionRecord, MetricKey, MetricSet, Timestamp};

/// Where a block sits: its file position and the file's classification.
#[derive(Debug, Clone)]
pub struct RecordContext<'a> {
    /// 1-based execution sequence number within the file.
    pub execution_id: u32,
    pub category: &'a str,
    pub group: &'a str,
    /// Time of the group's first execution, used when the block carries no
    /// timestamp of its own.
    pub base_time: NaiveDateTime,
}

/// Build the record for one block.
pub fn normalize(set: &MetricSet, ctx: &RecordContext<'_>, scoring: &ScoringConfig) -> ExecutionRecord {
    let max_rss_kb = set.integer(MetricKey::MaxRssKb);
    let elapsed_sec = set.get(MetricKey::ElapsedTime).map(parse_elapsed).unwrap_or(0.0);
    let cpu_percent = set.integer(MetricKey::CpuPercent);

    ExecutionRecord {
        execution_id: ctx.execution_id,
        timestamp: resolve_timestamp(set.timestamp.as_deref(), ctx.execution_id, ctx.base_time),
        group: ctx.group.to_string(),
        category: ctx.category.to_string(),

        max_rss_kb,
        elapsed_sec,
        user_time_sec: set.decimal(MetricKey::UserTimeSec),
        system_time_sec: set.decimal(MetricKey::SystemTimeSec),
        cpu_percent,
        minor_page_faults: set.integer(MetricKey::MinorPageFaults),
        major_page_faults: set.integer(MetricKey::MajorPageFaults),
        voluntary_context_switches: set.integer(MetricKey::VoluntaryContextSwitches),
        involuntary_context_switches: set.integer(MetricKey::InvoluntaryContextSwitches),
        file_system_inputs: set.integer(MetricKey::FileSystemInputs),
        file_system_outputs: set.integer(MetricKey::FileSystemOutputs),
        socket_messages_sent: set.integer(MetricKey::SocketMessagesSent),
        socket_messages_received: set.integer(MetricKey::SocketMessagesReceived),
        signals_delivered: set.integer(MetricKey::SignalsDelivered),
        page_size_bytes: set.integer(MetricKey::PageSizeBytes),
        exit_status: set.integer(MetricKey::ExitStatus),

        max_rss_mb: memory_megabytes(max_rss_kb),
        efficiency_ratio: efficiency_ratio(max_rss_kb, elapsed_sec),
        memory_efficiency_score: memory_efficiency_score(max_rss_kb, scoring),
        performance_score: performance_score(max_rss_kb, cpu_percent, elapsed_sec, scoring),
    }
}

// ---------------------------------------------------------------------------
// Elapsed time
// ---------------------------------------------------------------------------

/// Seconds in a `time -v` wall-clock string.
///
/// `time` prints `M:SS.ss` for runs under an hour and `H:MM:SS.ss` beyond
/// that. Any other shape, or any unparsable part, yields `0.0`.
pub fn parse_elapsed(raw: &str) -> f64 {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    let parsed = match parts.as_slice() {
        [m, s] => whole(m).zip(seconds(s)).map(|(m, s)| m * 60.0 + s),
        [h, m, s] => whole(h)
            .zip(whole(m))
            .zip(seconds(s))
            .map(|((h, m), s)| h * 3600.0 + m * 60.0 + s),
        _ => None,
    };
    parsed.unwrap_or(0.0)
}

fn whole(part: &str) -> Option<f64> {
    part.parse::<u64>().ok().map(|v| v as f64)
}

fn seconds(part: &str) -> Option<f64> {
    part.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

/// Inverse of [`parse_elapsed`], in the format `time` itself would print.
pub fn format_elapsed(secs: f64) -> String {
    let secs = if secs.is_finite() && secs > 0.0 { secs } else { 0.0 };
    let hours = (secs / 3600.0).floor();
    let minutes = ((secs - hours * 3600.0) / 60.0).floor();
    let rest = secs - hours * 3600.0 - minutes * 60.0;
    if hours > 0.0 {
        format!("{hours}:{minutes:02}:{rest:05.2}")
    } else {
        format!("{minutes}:{rest:05.2}")
    }
}

// ---------------------------------------------------------------------------
// Timestamp resolution
// ---------------------------------------------------------------------------

/// Use the block's own timestamp when it has one; otherwise place execution
/// `n` at `base_time + (n - 1)` hours.
pub fn resolve_timestamp(observed: Option<&str>, execution_id: u32, base_time: NaiveDateTime) -> Timestamp {
    match observed {
        Some(raw) => Timestamp::Observed(raw.to_string()),
        None => {
            let offset = Duration::hours(i64::from(execution_id.saturating_sub(1)));
            Timestamp::Synthesized(base_time + offset)
        }
    }
}

// ---------------------------------------------------------------------------
// Derived fields
// ---------------------------------------------------------------------------

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn memory_megabytes(max_rss_kb: u64) -> f64 {
    round2(max_rss_kb as f64 / 1024.0)
}

/// `efficiency_constant / M`; zero when `M` is zero.
pub fn memory_efficiency_score(max_rss_kb: u64, scoring: &ScoringConfig) -> f64 {
    if max_rss_kb == 0 {
        return 0.0;
    }
    round2(scoring.efficiency_constant / max_rss_kb as f64)
}

/// Peak kilobytes per elapsed second; zero unless both are positive.
pub fn efficiency_ratio(max_rss_kb: u64, elapsed_sec: f64) -> f64 {
    if max_rss_kb == 0 || elapsed_sec <= 0.0 || !elapsed_sec.is_finite() {
        return 0.0;
    }
    round2(max_rss_kb as f64 / elapsed_sec)
}

/// Weighted 0–100 score rewarding low peak memory, low CPU share and low
/// latency (latency stops counting at `latency_cap_secs`).
pub fn performance_score(max_rss_kb: u64, cpu_percent: u64, elapsed_sec: f64, scoring: &ScoringConfig) -> f64 {
    let memory = if max_rss_kb > 0 {
        (100.0 * scoring.memory_baseline_kb / max_rss_kb as f64).clamp(0.0, 100.0)
    } else {
        0.0
    };
    let cpu = (100.0 - cpu_percent as f64).max(0.0);
    let elapsed = if elapsed_sec.is_finite() { elapsed_sec.max(0.0) } else { 0.0 };
    let latency = (100.0 - elapsed.min(scoring.latency_cap_secs)).max(0.0);

    let score = memory * scoring.memory_weight + cpu * scoring.cpu_weight + latency * scoring.latency_weight;
    round2(score.clamp(0.0, 100.0))
}
