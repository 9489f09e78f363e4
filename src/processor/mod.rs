//! Processor abstraction - the unit of transformation.
//!
//! A [`Processor`] receives every file a rule matched plus the run's
//! [`BuildOptions`] and returns a [`BuildSummary`] tallying the units of
//! work it built, skipped, and failed. This is the sole extension point for
//! format-specific transforms (image codecs, serializers, archivers,
//! external compiler wrappers).
//!
//! Processors come in four concrete shapes, along two independent axes:
//!
//! - **Granularity**: *single* (one input file -> one output file, each
//!   skippable and retryable independently) vs *batch* (the processor
//!   groups inputs itself; each batch rebuilds as one unit).
//! - **Metadata**: *typed* (the processor declares a sidecar metadata type
//!   with a default value) vs *untyped* (no metadata is loaded).
//!
//! Rather than a trait hierarchy, each shape is a user-facing trait
//! ([`SingleAssetProcessor`], [`TypedAssetProcessor`],
//! [`BatchAssetProcessor`], [`TypedBatchAssetProcessor`]) paired with an
//! adapter struct that implements [`Processor`] and owns the scheduling:
//! output-path mirroring, staleness gating, parallel execution, and
//! per-unit error accounting.
//!
//! # Example
//!
//! ```ignore
//! use assetpipe::processor::{CopyProcessor, SingleAsset};
//! use assetpipe::Builder;
//!
//! let mut builder = Builder::new();
//! builder.add_rule("*.txt", SingleAsset::new(CopyProcessor));
//! ```

mod batch;
mod single;

pub use batch::*;
pub use single::*;

use crate::error::ProcessError;
use crate::input::InputFile;
use crate::options::BuildOptions;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::path::Path;

/// Tally of a run's units of work: built, up-to-date, and failed.
///
/// Summaries from independent units or stages combine with `+`; a run
/// succeeded when `failed` is zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    /// Units rebuilt this run.
    pub built: usize,
    /// Units whose output was already up to date.
    pub skipped: usize,
    /// Units that failed.
    pub failed: usize,
}

impl BuildSummary {
    pub const fn new() -> Self {
        Self { built: 0, skipped: 0, failed: 0 }
    }

    pub(crate) const fn built_one() -> Self {
        Self { built: 1, skipped: 0, failed: 0 }
    }

    pub(crate) const fn skipped_one() -> Self {
        Self { built: 0, skipped: 1, failed: 0 }
    }

    pub(crate) const fn failed_one() -> Self {
        Self { built: 0, skipped: 0, failed: 1 }
    }
}

impl Add for BuildSummary {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            built: self.built + rhs.built,
            skipped: self.skipped + rhs.skipped,
            failed: self.failed + rhs.failed,
        }
    }
}

impl AddAssign for BuildSummary {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for BuildSummary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::new(), Add::add)
    }
}

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed, {} up-to-date",
            self.built, self.failed, self.skipped
        )
    }
}

/// The unit of transformation registered on a [`Builder`](crate::Builder).
///
/// Invoked once per rule per run with every matched file. Returns the
/// run's built/skipped/failed tally (zero failures = success).
/// Implementations must catch their own per-unit failures; a run is never
/// unwound by a processor.
pub trait Processor: Send + Sync {
    /// Process the rule's matched files, returning the unit tally.
    fn process(&self, inputs: &[InputFile], options: &BuildOptions) -> BuildSummary;
}

/// Create an output file's parent directory.
///
/// Idempotent and safe under concurrent callers creating the same or
/// sibling directories.
pub(crate) fn ensure_parent_dir(output: &Path) -> Result<(), ProcessError> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
