//! Sidecar metadata loading.
//!
//! For any asset `name.ext` an optional `name.ext.meta` JSON file holds
//! processor-defined fields. Absence is not an error: the processor's
//! declared default value is used instead, with no I/O.

use crate::error::MetadataError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Load sidecar metadata, or return the processor's default.
///
/// `None` means no sidecar exists and `default` is returned untouched.
/// A sidecar that cannot be read or does not deserialize into `M` is an
/// error naming the metadata path.
pub fn load_metadata<M: DeserializeOwned>(
    path: Option<&Path>,
    default: M,
) -> Result<M, MetadataError> {
    match path {
        Some(path) => read_metadata(path),
        None => Ok(default),
    }
}

/// Read and deserialize a sidecar file that is known to exist.
pub fn read_metadata<M: DeserializeOwned>(path: &Path) -> Result<M, MetadataError> {
    let text = std::fs::read_to_string(path).map_err(|e| MetadataError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&text).map_err(|e| MetadataError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}
