//! Column sets of the two table shapes tvstat writes.

use std::collections::BTreeMap;

use tvstat_core::config::CategoryConfig;
use tvstat_core::normalizer::round2;
use tvstat_core::{ExecutionRecord, GroupSummary, Stats};

use crate::Row;

/// Column order of the per-category tables.
pub const RECORD_COLUMNS: &[&str] = &[
    "execution_id",
    "timestamp",
    "day",
    "application",
    "max_rss_kb",
    "max_rss_mb",
    "elapsed_sec",
    "user_time_sec",
    "system_time_sec",
    "cpu_percent",
    "minor_page_faults",
    "major_page_faults",
    "voluntary_context_switches",
    "involuntary_context_switches",
    "file_system_outputs",
    "file_system_inputs",
    "socket_messages_sent",
    "socket_messages_received",
    "exit_status",
    "efficiency_ratio",
    "memory_efficiency_score",
    "performance_score",
];

impl Row for ExecutionRecord {
    fn cell(&self, column: &str) -> Option<String> {
        let value = match column {
            "execution_id" => self.execution_id.to_string(),
            "timestamp" => self.timestamp.to_string(),
            "day" => self.group.clone(),
            "application" => self.category.clone(),
            "max_rss_kb" => self.max_rss_kb.to_string(),
            "max_rss_mb" => self.max_rss_mb.to_string(),
            "elapsed_sec" => self.elapsed_sec.to_string(),
            "user_time_sec" => self.user_time_sec.to_string(),
            "system_time_sec" => self.system_time_sec.to_string(),
            "cpu_percent" => self.cpu_percent.to_string(),
            "minor_page_faults" => self.minor_page_faults.to_string(),
            "major_page_faults" => self.major_page_faults.to_string(),
            "voluntary_context_switches" => self.voluntary_context_switches.to_string(),
            "involuntary_context_switches" => self.involuntary_context_switches.to_string(),
            "file_system_outputs" => self.file_system_outputs.to_string(),
            "file_system_inputs" => self.file_system_inputs.to_string(),
            "socket_messages_sent" => self.socket_messages_sent.to_string(),
            "socket_messages_received" => self.socket_messages_received.to_string(),
            "signals_delivered" => self.signals_delivered.to_string(),
            "page_size_bytes" => self.page_size_bytes.to_string(),
            "exit_status" => self.exit_status.to_string(),
            "efficiency_ratio" => self.efficiency_ratio.to_string(),
            "memory_efficiency_score" => self.memory_efficiency_score.to_string(),
            "performance_score" => self.performance_score.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

/// Metrics summarised per category, as they appear in column names.
const SUMMARY_METRICS: [&str; 4] = ["memory_kb", "cpu_percent", "elapsed_sec", "performance_score"];
const STAT_NAMES: [&str; 4] = ["avg", "min", "max", "spread"];
const COMPARISON_COLUMNS: [&str; 3] = [
    "memory_efficiency_ratio",
    "cpu_improvement_percent",
    "speed_improvement_percent",
];

/// Column order of the combined summary for the configured categories.
pub fn summary_columns(categories: &[CategoryConfig]) -> Vec<String> {
    let mut columns = vec!["day".to_string()];
    for cat in categories {
        columns.push(format!("{}_measurements", cat.prefix));
        for metric in SUMMARY_METRICS {
            for stat in STAT_NAMES {
                columns.push(format!("{}_{stat}_{metric}", cat.prefix));
            }
        }
    }
    columns.extend(COMPARISON_COLUMNS.iter().map(|c| c.to_string()));
    columns
}

/// Cells of one summary row keyed by column name.
pub fn summary_row(summary: &GroupSummary) -> BTreeMap<String, String> {
    let mut row = BTreeMap::new();
    row.insert("day".to_string(), summary.group.clone());
    for cat in &summary.categories {
        row.insert(format!("{}_measurements", cat.prefix), cat.count.to_string());
        let per_metric: [(&str, &Stats); 4] = [
            ("memory_kb", &cat.memory_kb),
            ("cpu_percent", &cat.cpu_percent),
            ("elapsed_sec", &cat.elapsed_sec),
            ("performance_score", &cat.performance_score),
        ];
        for (metric, stats) in per_metric {
            let values = [stats.mean, stats.min, stats.max, stats.spread];
            for (stat, value) in STAT_NAMES.iter().zip(values) {
                row.insert(format!("{}_{stat}_{metric}", cat.prefix), round2(value).to_string());
            }
        }
    }
    let ratios = &summary.comparison;
    for (column, value) in COMPARISON_COLUMNS.iter().zip([
        ratios.memory_efficiency_ratio,
        ratios.cpu_improvement_percent,
        ratios.speed_improvement_percent,
    ]) {
        row.insert(column.to_string(), value.to_string());
    }
    row
}
