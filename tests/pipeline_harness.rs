#![allow(unused)]
//! End-to-end harness: log directory in, CSV tables and report out.
//!
//! # What this covers
//!
//! - Discovery, file name classification, parsing and table writing through
//!   [`tvstat::run`].
//! - Category tables are only written when the category has records.
//! - Re-running over the same inputs rewrites byte-identical outputs.
//! - Unclassifiable and unreadable inputs are skipped, not fatal.
//!
//! # Running
//!
//! ```sh
//! cargo test --test pipeline_harness
//! ```

mod common;
use common::*;

use pretty_assertions::assert_eq;
use tvstat::{Override, RunOptions};
use tvstat_core::Config;
use tvstat_sink::RECORD_COLUMNS;

fn options(dir: &LogDir) -> RunOptions {
    RunOptions {
        input: Some(dir.input()),
        output: Some(dir.output()),
        ..RunOptions::default()
    }
}

fn three_files() -> LogDir {
    LogDir::new()
        .file("bench_go_day1.log", go_log(2))
        .file("bench_py_day1.log", py_log(2))
        .file("bench_go_day2.log", format!("{PREAMBLE}{}", go_log(1)))
        .file("notes.txt", "not a log")
}

#[test]
fn writes_category_tables_and_summary() {
    let dir = three_files();
    let summary = tvstat::run(&Config::defaults(), &options(&dir)).unwrap();

    assert_eq!(
        dir.output_files(),
        ["combined_summary.csv", "golang_metrics.csv", "python_metrics.csv"]
    );
    assert_eq!(summary.records["golang"], 3);
    assert_eq!(summary.records["python"], 2);
    assert_eq!(summary.groups, ["day1", "day2"]);
    assert!(summary.skipped.is_empty());

    let go = read_table(&dir.output().join("golang_metrics.csv"));
    assert_eq!(go.header, RECORD_COLUMNS);
    assert_eq!(go.column("execution_id"), ["1", "2", "1"]);
    assert_eq!(go.column("day"), ["day1", "day1", "day2"]);
    assert_eq!(go.column("application"), ["golang", "golang", "golang"]);
    assert_eq!(go.column("timestamp")[2], "2026-02-06 07:00:00");

    let combined = read_table(&dir.output().join("combined_summary.csv"));
    assert_eq!(combined.column("day"), ["day1", "day2"]);
    assert_eq!(combined.column("go_measurements"), ["2", "1"]);
    assert_eq!(combined.column("py_measurements"), ["2", "0"]);
    assert_eq!(combined.column("memory_efficiency_ratio"), ["11.53", "0"]);
    assert_eq!(combined.column("cpu_improvement_percent"), ["65", "0"]);
    assert_eq!(combined.column("speed_improvement_percent"), ["-100", "0"]);
}

#[test]
fn rerun_is_byte_identical() {
    let dir = three_files();
    let mut opts = options(&dir);
    opts.report = true;
    tvstat::run(&Config::defaults(), &opts).unwrap();
    let first: Vec<String> = dir.output_files().iter().map(|f| dir.read_output(f)).collect();
    tvstat::run(&Config::defaults(), &opts).unwrap();
    let second: Vec<String> = dir.output_files().iter().map(|f| dir.read_output(f)).collect();
    assert_eq!(first.len(), 4);
    assert_eq!(first, second);
}

#[test]
fn category_without_logs_gets_no_table() {
    let dir = LogDir::new().file("bench_py_day1.log", py_log(1));
    tvstat::run(&Config::defaults(), &options(&dir)).unwrap();
    assert_eq!(dir.output_files(), ["combined_summary.csv", "python_metrics.csv"]);
}

#[test]
fn empty_input_dir_writes_nothing() {
    let dir = LogDir::new();
    let summary = tvstat::run(&Config::defaults(), &options(&dir)).unwrap();
    assert!(summary.outputs.is_empty());
    assert!(dir.output_files().is_empty());
}

#[test]
fn missing_input_dir_is_an_error() {
    let dir = LogDir::new();
    let mut opts = options(&dir);
    opts.input = Some(dir.root().join("nope"));
    assert!(tvstat::run(&Config::defaults(), &opts).is_err());
}

#[test]
fn unclassifiable_file_is_skipped() {
    let dir = LogDir::new()
        .file("bench_go_day1.log", go_log(1))
        .file("mystery.log", go_log(1));
    let mut opts = options(&dir);
    opts.files = vec![dir.input().join("mystery.log"), dir.input().join("bench_go_day1.log")];
    let summary = tvstat::run(&Config::defaults(), &opts).unwrap();
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].name, "mystery.log");
    assert_eq!(summary.records["golang"], 1);
}

#[test]
fn unreadable_file_is_skipped() {
    let dir = LogDir::new().file("bench_go_day1.log", go_log(1));
    let mut opts = options(&dir);
    opts.files = vec![dir.input().join("bench_go_day9.log"), dir.input().join("bench_go_day1.log")];
    let summary = tvstat::run(&Config::defaults(), &opts).unwrap();
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].name, "bench_go_day9.log");
    assert_eq!(summary.files.len(), 1);
}

#[test]
fn explicit_classification_bypasses_file_names() {
    let dir = LogDir::new().file("capture.out", py_log(2));
    let mut opts = options(&dir);
    opts.files = vec![dir.input().join("capture.out")];
    opts.classification = Some(Override {
        category: "python".into(),
        group: "day3".into(),
    });
    let summary = tvstat::run(&Config::defaults(), &opts).unwrap();
    assert_eq!(summary.records["python"], 2);
    assert_eq!(summary.groups, ["day3"]);
    let py = read_table(&dir.output().join("python_metrics.csv"));
    assert_eq!(py.column("timestamp")[1], "2026-02-07 08:00:00");
}

#[test]
fn unknown_override_category_is_rejected() {
    let dir = LogDir::new();
    let mut opts = options(&dir);
    opts.classification = Some(Override {
        category: "rust".into(),
        group: "day1".into(),
    });
    assert!(tvstat::run(&Config::defaults(), &opts).is_err());
}

#[test]
fn report_has_bars_and_ratios() {
    let dir = three_files();
    let mut opts = options(&dir);
    opts.report = true;
    let summary = tvstat::run(&Config::defaults(), &opts).unwrap();
    assert!(summary.outputs.iter().any(|o| o.rows.is_none()));
    let report = dir.read_output("summary_report.txt");
    assert!(report.contains("Mean peak memory"));
    assert!(report.contains('█'));
    assert!(report.contains("python vs golang"));
    assert!(report.contains("11.53"));
}

#[test]
fn single_record_table_snapshot() {
    let dir = LogDir::new().file(
        "bench_go_day1.log",
        ReportBuilder::new().timestamp("2026/02/05 08:00:03").build(),
    );
    tvstat::run(&Config::defaults(), &options(&dir)).unwrap();
    insta::assert_snapshot!(dir.read_output("golang_metrics.csv"), @r"
execution_id,timestamp,day,application,max_rss_kb,max_rss_mb,elapsed_sec,user_time_sec,system_time_sec,cpu_percent,minor_page_faults,major_page_faults,voluntary_context_switches,involuntary_context_switches,file_system_outputs,file_system_inputs,socket_messages_sent,socket_messages_received,exit_status,efficiency_ratio,memory_efficiency_score,performance_score
1,2026/02/05 08:00:03,day1,golang,13107,12.8,10,0.12,0.03,7,1450,2,310,12,16,8,4,5,0,1310.7,76.3,58.03
");
}

#[test]
fn summary_float_cells_are_rounded() {
    let text = format!(
        "{}{}",
        ReportBuilder::new().elapsed("0:10.00").build(),
        ReportBuilder::new().elapsed("0:02.15").build()
    );
    let dir = LogDir::new().file("bench_go_day1.log", text);
    tvstat::run(&Config::defaults(), &options(&dir)).unwrap();

    let go = read_table(&dir.output().join("golang_metrics.csv"));
    assert_eq!(go.column("performance_score"), ["58.03", "60.38"]);

    let combined = read_table(&dir.output().join("combined_summary.csv"));
    assert_eq!(combined.column("go_spread_performance_score"), ["2.35"]);
    assert_eq!(combined.column("go_avg_performance_score"), ["59.21"]);
    assert_eq!(combined.column("go_spread_elapsed_sec"), ["7.85"]);
}
