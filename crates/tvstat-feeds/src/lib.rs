//! tvstat-feeds — input side of tvstat.
//!
//! Finds `time -v` log files on disk, classifies each one by category and
//! group from its file name, and exposes it to the core pipeline as a
//! [`tvstat_core::LogSource`].

pub mod classify;
pub mod file;

pub use classify::classify;
pub use file::{discover, read_lossy, LogFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("input directory {0} does not exist")]
    MissingDir(std::path::PathBuf),
    #[error("invalid file pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("cannot read {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}: no category token in file name and no default category configured")]
    Unclassified(String),
}
