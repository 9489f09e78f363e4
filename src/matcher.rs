//! File matching for build rules.
//!
//! A [`Matcher`] selects files under a root directory with an include glob
//! pattern, optionally subtracting an exclude pattern, either across the
//! full subtree or the top level only.

use crate::error::MatchError;
use glob::glob;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// How far a matcher descends from the root directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchScope {
    /// Match files anywhere in the subtree
    #[default]
    Recursive,
    /// Match files directly under the root only
    TopLevel,
}

/// Matches files in a directory against include/exclude glob patterns.
#[derive(Debug, Clone)]
pub struct Matcher {
    include: String,
    exclude: Option<String>,
    scope: MatchScope,
}

impl Matcher {
    /// Create a matcher that includes files matching `pattern` recursively.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self { include: pattern.into(), exclude: None, scope: MatchScope::Recursive }
    }

    /// Subtract files matching `pattern` from the include set.
    ///
    /// This is a set difference, not a negative glob: the exclude set is
    /// computed the same way the include set is and removed from it.
    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude = Some(pattern.into());
        self
    }

    /// Set the recursion scope.
    pub fn with_scope(mut self, scope: MatchScope) -> Self {
        self.scope = scope;
        self
    }

    /// Match files under `root`.
    ///
    /// Returns a sorted list of matching file paths. An empty result is a
    /// valid, non-error outcome; a missing root directory is an error.
    pub fn matches(&self, root: &Path) -> Result<Vec<PathBuf>, MatchError> {
        if !root.is_dir() {
            return Err(MatchError::RootNotFound(root.to_path_buf()));
        }

        let mut files = self.collect(root, &self.include)?;

        if let Some(exclude) = &self.exclude {
            let excluded = self.collect(root, exclude)?;
            files = files.difference(&excluded).cloned().collect();
        }

        Ok(files.into_iter().collect())
    }

    /// Collect the set of files matching one pattern under `root`.
    fn collect(&self, root: &Path, pattern: &str) -> Result<BTreeSet<PathBuf>, MatchError> {
        let full_pattern = match self.scope {
            MatchScope::Recursive => root.join("**").join(pattern),
            MatchScope::TopLevel => root.join(pattern),
        };
        let pattern_str = full_pattern.to_string_lossy();

        let paths = glob(&pattern_str).map_err(|e| MatchError::InvalidPattern {
            pattern: pattern.to_string(),
            source: e,
        })?;

        let mut files = BTreeSet::new();
        for entry in paths {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        files.insert(path);
                    }
                }
                Err(e) => {
                    // Log but continue on unreadable entries
                    eprintln!("Warning: error reading path: {}", e);
                }
            }
        }

        Ok(files)
    }
}

impl From<&str> for Matcher {
    fn from(pattern: &str) -> Self {
        Matcher::new(pattern)
    }
}

impl From<String> for Matcher {
    fn from(pattern: String) -> Self {
        Matcher::new(pattern)
    }
}
