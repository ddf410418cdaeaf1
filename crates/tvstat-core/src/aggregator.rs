//! Aggregator — per-group, per-category summary statistics.
//!
//! A pure one-shot pass over collected [`ExecutionRecord`]s. Groups are
//! emitted in lexical label order; every configured category appears in
//! every group, zeroed when it has no records there.

use std::collections::BTreeMap;

use crate::config::{CategoryConfig, ComparisonConfig};
use crate::normalizer::round2;
use crate::types::ExecutionRecord;

/// Count, mean, min, max and spread of one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    pub count: usize,
    /// Arithmetic mean, unrounded. Ratios are computed from this; round only
    /// for display.
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// `max - min`, rounded to two decimals.
    pub spread: f64,
}

impl Stats {
    /// Summarise `values`. An empty input gives all zeros.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        if count == 0 {
            return Self::default();
        }
        Self {
            count,
            mean: sum / count as f64,
            min,
            max,
            spread: round2(max - min),
        }
    }
}

/// Statistics for one category within one group.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    /// Column prefix from the category config.
    pub prefix: String,
    pub count: usize,
    pub memory_kb: Stats,
    pub cpu_percent: Stats,
    pub elapsed_sec: Stats,
    pub performance_score: Stats,
}

impl CategorySummary {
    fn from_records(category: &CategoryConfig, records: &[&ExecutionRecord]) -> Self {
        let stats = |f: fn(&ExecutionRecord) -> f64| Stats::from_values(records.iter().map(|r| f(r)));
        Self {
            category: category.name.clone(),
            prefix: category.prefix.clone(),
            count: records.len(),
            memory_kb: stats(|r| r.max_rss_kb as f64),
            cpu_percent: stats(|r| r.cpu_percent as f64),
            elapsed_sec: stats(|r| r.elapsed_sec),
            performance_score: stats(|r| r.performance_score),
        }
    }
}

/// Baseline-vs-candidate ratios for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Comparison {
    /// Baseline mean memory divided by candidate mean memory.
    pub memory_efficiency_ratio: f64,
    /// How much lower the candidate's mean CPU share is, in percent of the
    /// baseline's.
    pub cpu_improvement_percent: f64,
    /// How much lower the candidate's mean elapsed time is, in percent of the
    /// baseline's.
    pub speed_improvement_percent: f64,
}

impl Comparison {
    /// Ratios are zero unless both sides have records and the denominator is
    /// positive.
    pub fn between(baseline: &CategorySummary, candidate: &CategorySummary) -> Self {
        if baseline.count == 0 || candidate.count == 0 {
            return Self::default();
        }
        let ratio = |num: f64, den: f64| if den > 0.0 { round2(num / den) } else { 0.0 };
        let improvement = |base: f64, cand: f64| {
            if base > 0.0 {
                round2((base - cand) / base * 100.0)
            } else {
                0.0
            }
        };
        Self {
            memory_efficiency_ratio: ratio(baseline.memory_kb.mean, candidate.memory_kb.mean),
            cpu_improvement_percent: improvement(baseline.cpu_percent.mean, candidate.cpu_percent.mean),
            speed_improvement_percent: improvement(baseline.elapsed_sec.mean, candidate.elapsed_sec.mean),
        }
    }
}

/// One summary row per group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub group: String,
    /// One entry per configured category, in configuration order.
    pub categories: Vec<CategorySummary>,
    pub comparison: Comparison,
}

impl GroupSummary {
    pub fn category(&self, name: &str) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.category == name)
    }
}

/// Partition `records` by group then category and summarise each partition.
///
/// Records whose category is not configured are ignored here; they can only
/// arise from callers bypassing classification.
pub fn aggregate(
    records: &[ExecutionRecord],
    categories: &[CategoryConfig],
    comparison: &ComparisonConfig,
) -> Vec<GroupSummary> {
    let mut by_group: BTreeMap<&str, BTreeMap<&str, Vec<&ExecutionRecord>>> = BTreeMap::new();
    for record in records {
        by_group
            .entry(record.group.as_str())
            .or_default()
            .entry(record.category.as_str())
            .or_default()
            .push(record);
    }

    by_group
        .into_iter()
        .map(|(group, by_category)| {
            let summaries: Vec<CategorySummary> = categories
                .iter()
                .map(|cat| {
                    let recs = by_category.get(cat.name.as_str()).map(Vec::as_slice).unwrap_or(&[]);
                    CategorySummary::from_records(cat, recs)
                })
                .collect();

            let find = |name: &str| summaries.iter().find(|s| s.category == name);
            let ratios = match (find(&comparison.baseline), find(&comparison.candidate)) {
                (Some(base), Some(cand)) => Comparison::between(base, cand),
                _ => Comparison::default(),
            };

            GroupSummary {
                group: group.to_string(),
                categories: summaries,
                comparison: ratios,
            }
        })
        .collect()
}
