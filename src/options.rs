//! Per-run build options.

use std::path::{Path, PathBuf};

/// Immutable configuration for one builder run.
///
/// Shared read-only by every concurrent processor invocation of the run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Build profile name, for profile-dependent transform behavior
    pub profile: String,
    /// Root directory the run reads assets from
    pub input_dir: PathBuf,
    /// Root directory the run writes outputs into
    pub output_dir: PathBuf,
    /// Parallelism limit for the run's worker pool
    pub threads: usize,
}

impl BuildOptions {
    /// Create options for one run.
    pub fn new(
        profile: impl Into<String>,
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        threads: usize,
    ) -> Self {
        Self {
            profile: profile.into(),
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            threads: threads.max(1),
        }
    }

    /// An input path relative to the input root.
    ///
    /// Falls back to the file name for paths outside the root (callers are
    /// expected to only pass paths the matcher produced).
    pub fn relative_path(&self, input: &Path) -> PathBuf {
        input
            .strip_prefix(&self.input_dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(input.file_name().unwrap_or_default()))
    }

    /// Mirror an input path onto the output root and apply a new extension.
    ///
    /// `output_extension` is the extension without a leading dot; an empty
    /// string leaves the input's extension unchanged.
    pub fn mirror_output_path(&self, input: &Path, output_extension: &str) -> PathBuf {
        let mut out = self.output_dir.join(self.relative_path(input));
        if !output_extension.is_empty() {
            out.set_extension(output_extension);
        }
        out
    }

    /// A path under the output root (used by batch processors naming their
    /// own outputs).
    pub fn output_path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.output_dir.join(name)
    }
}
