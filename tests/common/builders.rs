//! Test builders — fluent constructors for report text and log directories.
//!
//! These panic on I/O failure rather than returning `Result`; they are for
//! readable test setup only.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::fixtures::GO_COMMAND;

// ---------------------------------------------------------------------------
// ReportBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for a single `time -v` report.
///
/// ```rust
/// let text = ReportBuilder::new().rss(13107).cpu(7).elapsed("0:10.00").build();
/// ```
pub struct ReportBuilder {
    command: String,
    rss_kb: Option<u64>,
    cpu_percent: u64,
    elapsed: String,
    timestamp: Option<String>,
    exit_status: u64,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            command: GO_COMMAND.to_string(),
            rss_kb: Some(13_107),
            cpu_percent: 7,
            elapsed: "0:10.00".to_string(),
            timestamp: None,
            exit_status: 0,
        }
    }

    pub fn command(mut self, command: &str) -> Self {
        self.command = command.to_string();
        self
    }

    pub fn rss(mut self, kb: u64) -> Self {
        self.rss_kb = Some(kb);
        self
    }

    /// Leave the peak memory line out entirely.
    pub fn without_rss(mut self) -> Self {
        self.rss_kb = None;
        self
    }

    pub fn cpu(mut self, percent: u64) -> Self {
        self.cpu_percent = percent;
        self
    }

    pub fn elapsed(mut self, clock: &str) -> Self {
        self.elapsed = clock.to_string();
        self
    }

    /// A `YYYY/MM/DD HH:MM:SS` log line at the end of the report.
    pub fn timestamp(mut self, ts: &str) -> Self {
        self.timestamp = Some(ts.to_string());
        self
    }

    pub fn exit_status(mut self, status: u64) -> Self {
        self.exit_status = status;
        self
    }

    pub fn build(self) -> String {
        let mut out = format!("\tCommand being timed: \"{}\"\n", self.command);
        out.push_str("\tUser time (seconds): 0.12\n");
        out.push_str("\tSystem time (seconds): 0.03\n");
        out.push_str(&format!("\tPercent of CPU this job got: {}%\n", self.cpu_percent));
        out.push_str(&format!("\tElapsed (wall clock) time (h:mm:ss or m:ss): {}\n", self.elapsed));
        if let Some(kb) = self.rss_kb {
            out.push_str(&format!("\tMaximum resident set size (kbytes): {kb}\n"));
        }
        out.push_str("\tMajor (requiring I/O) page faults: 2\n");
        out.push_str("\tMinor (reclaiming a frame) page faults: 1450\n");
        out.push_str("\tVoluntary context switches: 310\n");
        out.push_str("\tInvoluntary context switches: 12\n");
        out.push_str("\tFile system inputs: 8\n");
        out.push_str("\tFile system outputs: 16\n");
        out.push_str("\tSocket messages sent: 4\n");
        out.push_str("\tSocket messages received: 5\n");
        out.push_str(&format!("\tExit status: {}\n", self.exit_status));
        if let Some(ts) = self.timestamp {
            out.push_str(&format!("{ts} monitor-app: sample written\n"));
        }
        out
    }
}

// ---------------------------------------------------------------------------
// LogDir
// ---------------------------------------------------------------------------

/// A temporary `raw-logs/` + `analysis/` pair.
pub struct LogDir {
    root: TempDir,
}

impl Default for LogDir {
    fn default() -> Self {
        Self::new()
    }
}

impl LogDir {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir(root.path().join("raw-logs")).expect("create raw-logs");
        Self { root }
    }

    /// Write `name` into the input directory.
    pub fn file(self, name: &str, contents: impl AsRef<[u8]>) -> Self {
        std::fs::write(self.input().join(name), contents).expect("write log file");
        self
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn input(&self) -> PathBuf {
        self.root.path().join("raw-logs")
    }

    pub fn output(&self) -> PathBuf {
        self.root.path().join("analysis")
    }

    /// Contents of an output file.
    pub fn read_output(&self, name: &str) -> String {
        std::fs::read_to_string(self.output().join(name)).expect("read output file")
    }

    /// Sorted file names in the output directory.
    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.output())
            .expect("read output dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
