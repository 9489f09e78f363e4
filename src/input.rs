//! Input file data model.
//!
//! An [`InputFile`] identifies one source asset plus its optional sidecar
//! metadata file (`<filename>.meta`). Sidecar files themselves are never
//! treated as input assets.

use std::path::{Path, PathBuf};

/// The sidecar extension. `hero.png` pairs with `hero.png.meta`.
pub const METADATA_EXTENSION: &str = "meta";

/// One source asset and its optional sidecar metadata file.
///
/// Immutable once discovered; created during rule resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Path to the asset file
    pub path: PathBuf,
    /// Path to the sidecar metadata file, if one exists on disk
    pub metadata_path: Option<PathBuf>,
}

impl InputFile {
    /// Create an input file, probing the filesystem for a sidecar.
    pub fn discover(path: PathBuf) -> Self {
        let sidecar = sidecar_path(&path);
        let metadata_path = if sidecar.exists() { Some(sidecar) } else { None };
        Self { path, metadata_path }
    }

    /// Create an input file with an explicit sidecar (mostly for tests).
    pub fn with_metadata(path: PathBuf, metadata_path: Option<PathBuf>) -> Self {
        Self { path, metadata_path }
    }

    /// The asset's extension, without the leading dot ("" if none).
    pub fn extension(&self) -> &str {
        self.path.extension().and_then(|e| e.to_str()).unwrap_or("")
    }
}

/// An input file paired with its deserialized metadata value.
///
/// Owned by the processor invocation that requested it.
#[derive(Debug, Clone)]
pub struct InputFileWithMetadata<M> {
    /// The underlying input file
    pub file: InputFile,
    /// Deserialized sidecar value, or the processor's declared default
    pub metadata: M,
}

/// One atomic unit of rebuild for a multi-input transform: an ordered
/// group of input files that produce a single output.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Member input files, in the order the processor grouped them
    pub inputs: Vec<InputFile>,
    /// The single output file this batch produces
    pub output: PathBuf,
}

/// A [`Batch`] whose members carry deserialized metadata.
#[derive(Debug, Clone)]
pub struct TypedBatch<M> {
    /// Member input files with their metadata, in grouping order
    pub inputs: Vec<InputFileWithMetadata<M>>,
    /// The single output file this batch produces
    pub output: PathBuf,
}

/// Compute the sidecar path for an asset: the full filename plus `.meta`.
pub fn sidecar_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".");
    os.push(METADATA_EXTENSION);
    PathBuf::from(os)
}

/// Check whether a path is a sidecar metadata file.
pub fn is_metadata_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(METADATA_EXTENSION)
}
