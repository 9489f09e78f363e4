//! Assetpipe - rule-driven asset build pipeline
//!
//! This library provides functionality to:
//! - Match content files under a source tree with include/exclude globs
//! - Route matched files to registered processors (single-asset or batch)
//! - Skip work whose outputs are already up to date (mtime comparison)
//! - Run independent units of work on a bounded worker pool
//! - Sequence a primary build and an optional post-process stage through
//!   an intermediate directory

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod matcher;
pub mod metadata;
pub mod options;
pub mod pipeline;
pub mod processor;
pub mod stale;

pub use builder::Builder;
pub use error::{BuildError, MatchError, MetadataError, ProcessError};
pub use input::{Batch, InputFile, InputFileWithMetadata, TypedBatch};
pub use matcher::{MatchScope, Matcher};
pub use options::BuildOptions;
pub use pipeline::Pipeline;
pub use processor::{BuildSummary, Processor};
