//! tvstat-sink — output side of tvstat.
//!
//! Writes uniformly shaped rows to CSV with a fixed column order
//! ([`TableSink`]), knows the column sets of the per-category and summary
//! tables ([`columns`]), and renders the plain-text comparison report
//! ([`report`]).

pub mod columns;
pub mod report;

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use tvstat_core::{Config, RunOutcome};

pub use columns::{summary_columns, summary_row, RECORD_COLUMNS};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// A row that can be looked up by column name.
///
/// Columns a row does not know are written as empty cells; anything the row
/// holds beyond the requested columns is ignored.
pub trait Row {
    fn cell(&self, column: &str) -> Option<String>;
}

impl Row for BTreeMap<String, String> {
    fn cell(&self, column: &str) -> Option<String> {
        self.get(column).cloned()
    }
}

// ---------------------------------------------------------------------------
// TableSink
// ---------------------------------------------------------------------------

/// CSV writer with a fixed column order. The header is written on creation.
pub struct TableSink<W: Write> {
    writer: csv::Writer<W>,
    columns: Vec<String>,
    rows: usize,
}

impl<W: Write> TableSink<W> {
    pub fn new<C: AsRef<str>>(inner: W, columns: &[C]) -> Result<Self, SinkError> {
        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(&columns)?;
        Ok(Self {
            writer,
            columns,
            rows: 0,
        })
    }

    pub fn write_row<R: Row + ?Sized>(&mut self, row: &R) -> Result<(), SinkError> {
        let cells = self.columns.iter().map(|c| row.cell(c).unwrap_or_default());
        self.writer.write_record(cells)?;
        self.rows += 1;
        Ok(())
    }

    /// Flush and return the underlying writer plus the number of data rows.
    pub fn finish(self) -> Result<(W, usize), SinkError> {
        let rows = self.rows;
        let inner = self
            .writer
            .into_inner()
            .map_err(|e| SinkError::Csv(csv::Error::from(e.into_error())))?;
        Ok((inner, rows))
    }
}

/// Write `rows` to a new file at `path`. Returns the number of data rows.
pub fn write_table<'a, C, R, I>(path: &Path, columns: &[C], rows: I) -> Result<usize, SinkError>
where
    C: AsRef<str>,
    R: Row + ?Sized + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let file = std::fs::File::create(path).map_err(|source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut sink = TableSink::new(file, columns)?;
    for row in rows {
        sink.write_row(row)?;
    }
    let (_, count) = sink.finish()?;
    Ok(count)
}

// ---------------------------------------------------------------------------
// Run outputs
// ---------------------------------------------------------------------------

/// A table written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    pub path: PathBuf,
    pub rows: usize,
}

/// Write the per-category tables and the combined summary into `dir`.
///
/// Categories without records and an empty summary are skipped with an info
/// log rather than written as header-only files.
pub fn write_outputs(outcome: &RunOutcome, config: &Config, dir: &Path) -> Result<Vec<WrittenTable>, SinkError> {
    std::fs::create_dir_all(dir).map_err(|source| SinkError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    for cat in &outcome.categories {
        if cat.records.is_empty() {
            info!(category = %cat.category, "no records for category, skipping table");
            continue;
        }
        let path = dir.join(&cat.output);
        let rows = write_table(&path, RECORD_COLUMNS, &cat.records)?;
        info!(category = %cat.category, rows, path = %path.display(), "wrote category table");
        written.push(WrittenTable { path, rows });
    }

    if outcome.summaries.is_empty() {
        info!("no records at all, skipping combined summary");
        return Ok(written);
    }
    let columns = summary_columns(&config.categories);
    let rows: Vec<BTreeMap<String, String>> = outcome.summaries.iter().map(summary_row).collect();
    let path = dir.join(&config.output.summary_file);
    let count = write_table(&path, &columns, &rows)?;
    info!(groups = count, path = %path.display(), "wrote combined summary");
    written.push(WrittenTable { path, rows: count });
    Ok(written)
}
