//! Error types for the build engine.
//!
//! Failures are resolved at the smallest unit of work that makes sense:
//! per-file and per-batch failures are caught by the processor adapters,
//! logged, and converted into error counts. The types here cover the
//! failures that *do* abort a run (bad patterns, missing roots, pool
//! setup) plus the unit-level errors the adapters catch.

use std::path::PathBuf;
use thiserror::Error;

/// Error while resolving a matcher against a directory.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MatchError {
    /// The root directory to search does not exist
    #[error("Root directory not found: {0}")]
    RootNotFound(PathBuf),
    /// Invalid glob pattern
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },
    /// IO error during file enumeration
    #[error("IO error while matching files: {0}")]
    Io(#[from] std::io::Error),
}

/// Error loading a sidecar metadata file.
///
/// Always names the metadata path so a failing sidecar can be found.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MetadataError {
    /// Sidecar file could not be read
    #[error("Failed to read metadata {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Sidecar file exists but does not deserialize into the declared type
    #[error("Failed to parse metadata {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Error from a single unit of processing work (one file or one batch).
///
/// These are caught at the unit boundary by the processor adapters and
/// turned into error-count increments; they never unwind a run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProcessError {
    /// IO failure while transforming
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Sidecar metadata failure
    #[error("{0}")]
    Metadata(#[from] MetadataError),
    /// An invoked external tool exited non-zero
    #[error("External tool exited with {status}: {output}")]
    Tool { status: i32, output: String },
    /// Processor-specific failure
    #[error("{0}")]
    Failed(String),
}

impl ProcessError {
    /// Shorthand for a processor-specific failure message.
    pub fn failed(msg: impl Into<String>) -> Self {
        ProcessError::Failed(msg.into())
    }
}

/// Error that aborts a builder or pipeline run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// Rule matching failed
    #[error(transparent)]
    Match(#[from] MatchError),
    /// Worker pool could not be created
    #[error("Failed to create worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// IO failure outside any unit of work
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
