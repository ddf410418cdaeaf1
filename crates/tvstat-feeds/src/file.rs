//! File feed — discovery and reading of log files on disk.

use std::path::{Path, PathBuf};

use tvstat_core::{Classification, LogSource};

use crate::FeedError;

/// A log file on disk together with its classification.
#[derive(Debug, Clone)]
pub struct LogFile {
    pub path: PathBuf,
    name: String,
    classification: Classification,
}

impl LogFile {
    pub fn new(path: impl Into<PathBuf>, classification: Classification) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            name,
            classification,
        }
    }
}

impl LogSource for LogFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn classification(&self) -> &Classification {
        &self.classification
    }

    fn read(&self) -> std::io::Result<String> {
        std::fs::read(&self.path).map(lossy)
    }
}

/// Read `path` as text, replacing invalid UTF-8 rather than failing on it.
pub fn read_lossy(path: &Path) -> Result<String, FeedError> {
    std::fs::read(path)
        .map(lossy)
        .map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn lossy(bytes: Vec<u8>) -> String {
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Regular files directly inside `dir` whose name matches any of `patterns`,
/// sorted by path.
pub fn discover(dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, FeedError> {
    if !dir.is_dir() {
        return Err(FeedError::MissingDir(dir.to_path_buf()));
    }
    let compiled = patterns
        .iter()
        .map(|p| {
            glob::Pattern::new(p).map_err(|source| FeedError::Pattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let entries = std::fs::read_dir(dir).map_err(|source| FeedError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| FeedError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if compiled.iter().any(|p| p.matches(&name)) {
            found.push(path);
        }
    }
    found.sort();
    found.dedup();
    tracing::debug!(dir = %dir.display(), count = found.len(), "discovered log files");
    Ok(found)
}
