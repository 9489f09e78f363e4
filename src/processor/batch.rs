//! Batch-asset processors: many input files map to one output file.
//!
//! The processor partitions its matched files into [`Batch`]es via a
//! grouping step, and each batch rebuilds as one unit: it is stale when
//! any member input (or that member's sidecar) is newer than the batch
//! output, and a failing batch counts as one error regardless of how many
//! inputs it holds.
//!
//! For the typed variant, metadata is loaded eagerly for *every* input in
//! parallel before grouping, so the grouping step can partition on
//! metadata fields (for example a sheet id). A sidecar that fails to load
//! is logged and counted, and that file falls back to the declared
//! default value rather than aborting the run.

use crate::error::{MetadataError, ProcessError};
use crate::input::{Batch, InputFile, InputFileWithMetadata, TypedBatch};
use crate::metadata::read_metadata;
use crate::options::BuildOptions;
use crate::processor::{ensure_parent_dir, BuildSummary, Processor};
use crate::stale::batch_is_stale;
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use std::path::Path;

/// A batch transform with no sidecar metadata.
pub trait BatchAssetProcessor: Send + Sync {
    /// Partition the rule's matched files into batches.
    ///
    /// Invoked once per run, synchronously, before any batch is built. A
    /// failure here aborts the rule and counts as one error.
    fn gather_batches(
        &self,
        inputs: Vec<InputFile>,
        options: &BuildOptions,
    ) -> Result<Vec<Batch>, ProcessError>;

    /// Build one batch's output from its member inputs.
    fn process_batch(&self, batch: &Batch, options: &BuildOptions) -> Result<(), ProcessError>;
}

/// A batch transform whose grouping and processing consume typed sidecar
/// metadata.
pub trait TypedBatchAssetProcessor: Send + Sync {
    /// The deserialized sidecar type.
    type Metadata: DeserializeOwned + Send + Sync;

    /// The value used when an input has no sidecar file, or when its
    /// sidecar fails to load.
    fn default_metadata(&self) -> Self::Metadata;

    /// Deserialize a sidecar file. Default: JSON via serde.
    fn deserialize_metadata(&self, path: &Path) -> Result<Self::Metadata, MetadataError> {
        read_metadata(path)
    }

    /// Partition the rule's matched files into batches.
    fn gather_batches(
        &self,
        inputs: Vec<InputFileWithMetadata<Self::Metadata>>,
        options: &BuildOptions,
    ) -> Result<Vec<TypedBatch<Self::Metadata>>, ProcessError>;

    /// Build one batch's output from its member inputs.
    fn process_batch(
        &self,
        batch: &TypedBatch<Self::Metadata>,
        options: &BuildOptions,
    ) -> Result<(), ProcessError>;
}

/// Adapter running a [`BatchAssetProcessor`] as a [`Processor`].
pub struct BatchAsset<P> {
    inner: P,
}

impl<P> BatchAsset<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: BatchAssetProcessor> Processor for BatchAsset<P> {
    fn process(&self, inputs: &[InputFile], options: &BuildOptions) -> BuildSummary {
        let batches = match self.inner.gather_batches(inputs.to_vec(), options) {
            Ok(batches) => batches,
            Err(e) => {
                // Grouping failure aborts this rule only, as one error.
                eprintln!("ERROR: failed to gather batches: {}", e);
                return BuildSummary::failed_one();
            }
        };

        batches
            .par_iter()
            .map(|batch| {
                if !batch_is_stale(&batch.inputs, &batch.output) {
                    return BuildSummary::skipped_one();
                }

                let built = ensure_parent_dir(&batch.output)
                    .and_then(|_| self.inner.process_batch(batch, options));

                match built {
                    Ok(()) => {
                        println!("{} file(s) -> {}", batch.inputs.len(), batch.output.display());
                        BuildSummary::built_one()
                    }
                    Err(e) => {
                        eprintln!("ERROR: {} ({})", e, batch.output.display());
                        BuildSummary::failed_one()
                    }
                }
            })
            .sum()
    }
}

/// Adapter running a [`TypedBatchAssetProcessor`] as a [`Processor`].
pub struct TypedBatchAsset<P> {
    inner: P,
}

impl<P> TypedBatchAsset<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: TypedBatchAssetProcessor> TypedBatchAsset<P> {
    /// Load metadata for every input in parallel.
    ///
    /// Returns the loaded inputs plus the number of sidecars that failed
    /// and fell back to the default value.
    fn preload_metadata(
        &self,
        inputs: &[InputFile],
    ) -> (Vec<InputFileWithMetadata<P::Metadata>>, usize) {
        let loaded: Vec<(InputFileWithMetadata<P::Metadata>, usize)> = inputs
            .par_iter()
            .map(|input| {
                let (metadata, errors) = match input.metadata_path.as_deref() {
                    Some(path) => match self.inner.deserialize_metadata(path) {
                        Ok(metadata) => (metadata, 0),
                        Err(e) => {
                            eprintln!("ERROR: {} ({})", e, input.path.display());
                            (self.inner.default_metadata(), 1)
                        }
                    },
                    None => (self.inner.default_metadata(), 0),
                };
                (InputFileWithMetadata { file: input.clone(), metadata }, errors)
            })
            .collect();

        let mut errors = 0;
        let inputs = loaded
            .into_iter()
            .map(|(input, e)| {
                errors += e;
                input
            })
            .collect();
        (inputs, errors)
    }
}

impl<P: TypedBatchAssetProcessor> Processor for TypedBatchAsset<P> {
    fn process(&self, inputs: &[InputFile], options: &BuildOptions) -> BuildSummary {
        let (loaded, load_errors) = self.preload_metadata(inputs);
        let mut summary = BuildSummary { failed: load_errors, ..BuildSummary::new() };

        let batches = match self.inner.gather_batches(loaded, options) {
            Ok(batches) => batches,
            Err(e) => {
                eprintln!("ERROR: failed to gather batches: {}", e);
                return summary + BuildSummary::failed_one();
            }
        };

        summary += batches
            .par_iter()
            .map(|batch| {
                if !batch_is_stale(batch.inputs.iter().map(|i| &i.file), &batch.output) {
                    return BuildSummary::skipped_one();
                }

                let built = ensure_parent_dir(&batch.output)
                    .and_then(|_| self.inner.process_batch(batch, options));

                match built {
                    Ok(()) => {
                        println!("{} file(s) -> {}", batch.inputs.len(), batch.output.display());
                        BuildSummary::built_one()
                    }
                    Err(e) => {
                        eprintln!("ERROR: {} ({})", e, batch.output.display());
                        BuildSummary::failed_one()
                    }
                }
            })
            .sum::<BuildSummary>();

        summary
    }
}
