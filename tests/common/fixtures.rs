//! Canned `time -v` output used across harnesses.

/// Command line the golang category expects.
pub const GO_COMMAND: &str = "./monitor-app --log";
/// Command line the python category expects.
pub const PY_COMMAND: &str = "/opt/monitoring/env/bin/python3 /opt/monitoring/monitor_server.py --log";

/// A fragment cut off mid-report, as left behind by a killed run.
pub const TRUNCATED_FRAGMENT: &str = "\tCommand being timed: \"./monitor-app --log\"\n\tUser time (seconds): 0.01\n";

/// Output the monitored program printed before `time` started reporting.
pub const PREAMBLE: &str = "\
monitor-app starting
collecting samples
sample 1 ok
sample 2 ok
";

/// One complete report in the exact layout GNU time prints with `-v`.
pub fn time_report(command: &str, rss_kb: u64, cpu_percent: u64, elapsed: &str) -> String {
    format!(
        "\tCommand being timed: \"{command}\"
\tUser time (seconds): 0.12
\tSystem time (seconds): 0.03
\tPercent of CPU this job got: {cpu_percent}%
\tElapsed (wall clock) time (h:mm:ss or m:ss): {elapsed}
\tAverage shared text size (kbytes): 0
\tAverage unshared data size (kbytes): 0
\tAverage stack size (kbytes): 0
\tAverage total size (kbytes): 0
\tMaximum resident set size (kbytes): {rss_kb}
\tAverage resident set size (kbytes): 0
\tMajor (requiring I/O) page faults: 2
\tMinor (reclaiming a frame) page faults: 1450
\tVoluntary context switches: 310
\tInvoluntary context switches: 12
\tSwaps: 0
\tFile system inputs: 8
\tFile system outputs: 16
\tSocket messages sent: 4
\tSocket messages received: 5
\tSignals delivered: 0
\tPage size (bytes): 4096
\tExit status: 0
"
    )
}

/// `count` golang reports with distinct peak memory values.
pub fn go_log(count: usize) -> String {
    (0..count)
        .map(|i| time_report(GO_COMMAND, 13_000 + i as u64 * 100, 7, "0:10.00"))
        .collect()
}

/// `count` python reports with distinct peak memory values.
pub fn py_log(count: usize) -> String {
    (0..count)
        .map(|i| time_report(PY_COMMAND, 150_000 + i as u64 * 1_000, 20, "0:05.00"))
        .collect()
}
