//! Rule registration and build execution.
//!
//! A [`Builder`] owns an ordered list of (matcher, processor) rules. A run
//! resolves each rule's matcher against the input root, pairs matched
//! files with their sidecars, and hands them to the rule's processor
//! inside a worker pool bounded by the run's thread count.
//!
//! Rules are independent: order matters only for log readability, and the
//! engine does not detect two rules writing the same output path. Keeping
//! patterns disjoint (or using [`Matcher::with_exclude`]) is the caller's
//! responsibility.

use crate::error::BuildError;
use crate::input::{is_metadata_file, InputFile};
use crate::matcher::Matcher;
use crate::options::BuildOptions;
use crate::processor::{BuildSummary, Processor};
use std::io::ErrorKind;
use std::path::Path;

/// One (matcher, processor) pairing.
struct Rule {
    matcher: Matcher,
    processor: Box<dyn Processor>,
}

/// Keeps track of content rules and applies them to input files,
/// producing processed files in an output directory.
#[derive(Default)]
pub struct Builder {
    rules: Vec<Rule>,
}

impl Builder {
    /// Create a builder with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule. Rules run in registration order.
    ///
    /// Accepts a plain glob pattern (evaluated against the full input
    /// subtree) or a configured [`Matcher`].
    pub fn add_rule(
        &mut self,
        matcher: impl Into<Matcher>,
        processor: impl Processor + 'static,
    ) -> &mut Self {
        self.rules.push(Rule { matcher: matcher.into(), processor: Box::new(processor) });
        self
    }

    /// Number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Delete every file and subdirectory under `dir`, leaving the
    /// directory itself in place. A missing directory is a no-op.
    ///
    /// Returns the number of entries that could not be removed; each
    /// failure is logged and does not abort the remaining removals.
    pub fn clean(dir: &Path) -> usize {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return 0,
            Err(e) => {
                eprintln!("ERROR: failed to clean {}: {}", dir.display(), e);
                return 1;
            }
        };

        let mut errors = 0;
        for entry in entries {
            let removed = entry.and_then(|entry| {
                let path = entry.path();
                if path.is_dir() {
                    std::fs::remove_dir_all(&path)
                } else {
                    std::fs::remove_file(&path)
                }
            });

            if let Err(e) = removed {
                eprintln!("ERROR: failed to clean entry: {}", e);
                errors += 1;
            }
        }
        errors
    }

    /// Run every rule against `input_dir`, writing into `output_dir`.
    ///
    /// Returns the built/skipped/failed tally summed across all rules
    /// (zero failures = success). The worker pool is bounded by `threads`;
    /// every processor invocation of the run shares it.
    pub fn run(
        &self,
        profile: &str,
        threads: usize,
        input_dir: &Path,
        output_dir: &Path,
    ) -> Result<BuildSummary, BuildError> {
        let options = BuildOptions::new(profile, input_dir, output_dir, threads);

        let pool = rayon::ThreadPoolBuilder::new().num_threads(options.threads).build()?;

        pool.install(|| {
            let mut summary = BuildSummary::new();

            for rule in &self.rules {
                let matched = rule.matcher.matches(input_dir)?;

                let inputs: Vec<InputFile> = matched
                    .into_iter()
                    .filter(|path| !is_metadata_file(path))
                    .map(InputFile::discover)
                    .collect();

                if inputs.is_empty() {
                    continue;
                }

                summary += rule.processor.process(&inputs, &options);
            }

            Ok(summary)
        })
    }
}
