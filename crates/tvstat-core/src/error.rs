//! Error types for tvstat-core.
//!
//! Only whole-file failures surface as errors. Field-level problems inside a
//! block degrade to zero and never reach this type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input could not be read (missing, permissions, I/O).
    #[error("cannot read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
    /// The input was classified into a category the configuration lacks.
    #[error("{name}: category {category:?} is not configured")]
    UnknownCategory { name: String, category: String },
    /// A category's `command_pattern` is not a valid regex.
    #[error("category {category:?}: invalid command pattern: {source}")]
    CommandPattern {
        category: String,
        #[source]
        source: regex::Error,
    },
}
