//! Single-asset processors: one input file maps to one output file.
//!
//! Each matched file is an independent unit of work, processed in parallel
//! and skipped or failed on its own. The output path is computed by
//! mirroring the input's path relative to the input root onto the output
//! root, then applying the processor's output extension.

use crate::error::{MetadataError, ProcessError};
use crate::input::InputFile;
use crate::metadata::read_metadata;
use crate::options::BuildOptions;
use crate::processor::{ensure_parent_dir, BuildSummary, Processor};
use crate::stale::is_stale;
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use std::path::Path;

/// A single-asset transform with no sidecar metadata.
pub trait SingleAssetProcessor: Send + Sync {
    /// The output file's extension for a given input extension, without
    /// the leading dot. Default: unchanged.
    fn output_extension(&self, input_extension: &str) -> String {
        input_extension.to_string()
    }

    /// Transform one input file into one output file.
    fn process_file(
        &self,
        input: &InputFile,
        output: &Path,
        options: &BuildOptions,
    ) -> Result<(), ProcessError>;
}

/// A single-asset transform that consumes typed sidecar metadata.
pub trait TypedAssetProcessor: Send + Sync {
    /// The deserialized sidecar type.
    type Metadata: DeserializeOwned + Send;

    /// The value used when an input has no sidecar file.
    fn default_metadata(&self) -> Self::Metadata;

    /// Deserialize a sidecar file. Default: JSON via serde.
    fn deserialize_metadata(&self, path: &Path) -> Result<Self::Metadata, MetadataError> {
        read_metadata(path)
    }

    /// The output file's extension for a given input extension, without
    /// the leading dot. Default: unchanged.
    fn output_extension(&self, input_extension: &str) -> String {
        input_extension.to_string()
    }

    /// Transform one input file into one output file.
    fn process_file(
        &self,
        input: &InputFile,
        metadata: Self::Metadata,
        output: &Path,
        options: &BuildOptions,
    ) -> Result<(), ProcessError>;
}

/// Outcome of one single-asset unit of work.
enum Outcome {
    Built,
    Skipped,
}

/// Adapter running a [`SingleAssetProcessor`] as a [`Processor`].
pub struct SingleAsset<P> {
    inner: P,
}

impl<P> SingleAsset<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: SingleAssetProcessor> SingleAsset<P> {
    fn process_one(&self, input: &InputFile, options: &BuildOptions) -> Result<Outcome, ProcessError> {
        let ext = self.inner.output_extension(input.extension());
        let output = options.mirror_output_path(&input.path, &ext);

        if !is_stale(&input.path, input.metadata_path.as_deref(), &output) {
            return Ok(Outcome::Skipped);
        }

        ensure_parent_dir(&output)?;
        self.inner.process_file(input, &output, options)?;
        println!("{} -> {}", input.path.display(), output.display());
        Ok(Outcome::Built)
    }
}

impl<P: SingleAssetProcessor> Processor for SingleAsset<P> {
    fn process(&self, inputs: &[InputFile], options: &BuildOptions) -> BuildSummary {
        inputs
            .par_iter()
            .map(|input| match self.process_one(input, options) {
                Ok(Outcome::Built) => BuildSummary::built_one(),
                Ok(Outcome::Skipped) => BuildSummary::skipped_one(),
                Err(e) => {
                    eprintln!("ERROR: {} ({})", e, input.path.display());
                    BuildSummary::failed_one()
                }
            })
            .sum()
    }
}

/// Adapter running a [`TypedAssetProcessor`] as a [`Processor`].
pub struct TypedAsset<P> {
    inner: P,
}

impl<P> TypedAsset<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: TypedAssetProcessor> TypedAsset<P> {
    fn process_one(&self, input: &InputFile, options: &BuildOptions) -> Result<Outcome, ProcessError> {
        // A malformed sidecar fails this file, not the whole rule.
        let metadata = match input.metadata_path.as_deref() {
            Some(path) => self.inner.deserialize_metadata(path)?,
            None => self.inner.default_metadata(),
        };

        let ext = self.inner.output_extension(input.extension());
        let output = options.mirror_output_path(&input.path, &ext);

        if !is_stale(&input.path, input.metadata_path.as_deref(), &output) {
            return Ok(Outcome::Skipped);
        }

        ensure_parent_dir(&output)?;
        self.inner.process_file(input, metadata, &output, options)?;
        println!("{} -> {}", input.path.display(), output.display());
        Ok(Outcome::Built)
    }
}

impl<P: TypedAssetProcessor> Processor for TypedAsset<P> {
    fn process(&self, inputs: &[InputFile], options: &BuildOptions) -> BuildSummary {
        inputs
            .par_iter()
            .map(|input| match self.process_one(input, options) {
                Ok(Outcome::Built) => BuildSummary::built_one(),
                Ok(Outcome::Skipped) => BuildSummary::skipped_one(),
                Err(e) => {
                    eprintln!("ERROR: {} ({})", e, input.path.display());
                    BuildSummary::failed_one()
                }
            })
            .sum()
    }
}

/// Processor which copies each input file to its mirrored output path.
///
/// Used by the pipeline's pass-through stage and as the simplest possible
/// transform for rule sets that just want files carried across.
pub struct CopyProcessor;

impl SingleAssetProcessor for CopyProcessor {
    fn process_file(
        &self,
        input: &InputFile,
        output: &Path,
        _options: &BuildOptions,
    ) -> Result<(), ProcessError> {
        std::fs::copy(&input.path, output)?;
        Ok(())
    }
}
