//! Modification-time staleness checks.
//!
//! An output is stale when it is missing or older than its input (or that
//! input's sidecar metadata file). Staleness is the sole trigger for
//! rebuilding a unit of work.
//!
//! Timestamp comparison is deliberately the only mechanism: it keeps the
//! engine stateless beyond the output tree itself. Known limitation: clock
//! skew or coarse-mtime filesystems can miss a rebuild.

use crate::input::InputFile;
use std::path::Path;
use std::time::SystemTime;

/// Read a file's mtime, or `None` if it cannot be read.
fn mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Check whether `output` must be (re)built from `input`.
///
/// True if the output is missing, older than the input, or older than the
/// input's metadata file (when one exists). An unreadable input mtime also
/// reports stale; rebuilding is the safe answer when in doubt.
pub fn is_stale(input: &Path, metadata: Option<&Path>, output: &Path) -> bool {
    let out_time = match mtime(output) {
        Some(t) => t,
        None => return true,
    };

    match mtime(input) {
        Some(t) if t <= out_time => {}
        _ => return true,
    }

    if let Some(meta) = metadata {
        if meta.exists() {
            match mtime(meta) {
                Some(t) if t <= out_time => {}
                _ => return true,
            }
        }
    }

    false
}

/// Check whether a batch output must be rebuilt.
///
/// True if any member input (or its metadata) is newer than the output.
pub fn batch_is_stale<'a>(
    inputs: impl IntoIterator<Item = &'a InputFile>,
    output: &Path,
) -> bool {
    inputs
        .into_iter()
        .any(|input| is_stale(&input.path, input.metadata_path.as_deref(), output))
}
