//! Plain-text comparison report.
//!
//! Horizontal bar charts of per-category means, per-category ranges, then the
//! per-group comparison table. The output depends only on the run outcome,
//! so reruns over the same inputs render identical text.

use std::fmt;

use tvstat_core::{Config, RunOutcome, Stats};

/// Width of the longest bar, in cells.
pub const BAR_WIDTH: usize = 50;
const BAR: char = '█';

/// Text buffer written line by line.
#[derive(Default)]
struct Lines(String);

impl Lines {
    fn line(&mut self, args: fmt::Arguments<'_>) {
        self.0.push_str(&args.to_string());
        self.0.push('\n');
    }

    fn blank(&mut self) {
        self.0.push('\n');
    }

    fn heading(&mut self, title: &str) {
        self.line(format_args!("{title}"));
        self.line(format_args!("{}", "=".repeat(title.chars().count())));
    }
}

/// Render `title` and one bar per `(label, value)`, largest first.
pub fn bar_chart(title: &str, unit: &str, values: &[(String, f64)]) -> String {
    let mut out = Lines::default();
    out.heading(title);

    let mut sorted: Vec<&(String, f64)> = values.iter().collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let max = sorted.first().map(|(_, v)| *v).unwrap_or(0.0);
    let label_width = sorted.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let width = BAR_WIDTH;
    for (label, value) in sorted {
        let len = if max > 0.0 {
            ((value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let bar: String = std::iter::repeat(BAR).take(len).collect();
        out.line(format_args!("{label:<label_width$} | {bar:<width$} {value:.2} {unit}"));
    }
    out.0
}

/// Render the full report for one run.
pub fn render(outcome: &RunOutcome, config: &Config) -> String {
    let mut out = Lines::default();
    out.line(format_args!("tvstat resource usage report"));
    out.blank();

    out.heading("Measurements");
    for cat in &outcome.categories {
        out.line(format_args!("{:<12} {}", cat.category, cat.records.len()));
    }
    if !outcome.skipped.is_empty() {
        out.line(format_args!("skipped inputs: {}", outcome.skipped.len()));
    }
    out.blank();

    let overall: Vec<(String, Stats, Stats)> = outcome
        .categories
        .iter()
        .filter(|c| !c.records.is_empty())
        .map(|c| {
            let memory = Stats::from_values(c.records.iter().map(|r| r.max_rss_kb as f64));
            let elapsed = Stats::from_values(c.records.iter().map(|r| r.elapsed_sec));
            (c.category.clone(), memory, elapsed)
        })
        .collect();

    if overall.is_empty() {
        out.line(format_args!("No execution records."));
        return out.0;
    }

    let memory: Vec<(String, f64)> = overall.iter().map(|(n, m, _)| (n.clone(), m.mean)).collect();
    let elapsed: Vec<(String, f64)> = overall.iter().map(|(n, _, e)| (n.clone(), e.mean)).collect();
    let efficiency: Vec<(String, f64)> = overall
        .iter()
        .map(|(n, m, _)| {
            let score = if m.mean > 0.0 {
                config.scoring.efficiency_constant / m.mean
            } else {
                0.0
            };
            (n.clone(), score)
        })
        .collect();

    for chart in [
        bar_chart("Mean peak memory", "KB", &memory),
        bar_chart("Mean elapsed time", "s", &elapsed),
        bar_chart("Memory efficiency score", "", &efficiency),
    ] {
        out.0.push_str(&chart);
        out.blank();
    }

    out.heading("Ranges (min / avg / max)");
    for (name, memory, elapsed) in &overall {
        out.line(format_args!(
            "{name:<12} memory {:.0} / {:.2} / {:.0} KB, elapsed {:.2} / {:.2} / {:.2} s",
            memory.min, memory.mean, memory.max, elapsed.min, elapsed.mean, elapsed.max
        ));
    }
    out.blank();

    out.heading(&format!("{} vs {}", config.comparison.baseline, config.comparison.candidate));
    out.line(format_args!("{:<10} {:>12} {:>10} {:>10}", "group", "memory x", "cpu %", "speed %"));
    for summary in &outcome.summaries {
        let c = &summary.comparison;
        out.line(format_args!(
            "{:<10} {:>12.2} {:>10.2} {:>10.2}",
            summary.group, c.memory_efficiency_ratio, c.cpu_improvement_percent, c.speed_improvement_percent
        ));
    }
    out.0
}
