//! Multi-stage pipeline orchestration.
//!
//! A [`Pipeline`] sequences at most two [`Builder`] runs through an
//! intermediate directory, modeling a "compile then package" flow:
//!
//! 1. Optionally clean the final output directory.
//! 2. Run the primary builder from the source tree into the intermediate
//!    directory. A non-zero error count stops the pipeline there; the
//!    post-process stage never sees partially-built intermediate content.
//! 3. Run the post-process builder from the intermediate directory into
//!    the final output, or, when no post-process stage is configured,
//!    copy the intermediate tree into the final output preserving
//!    relative paths.
//!
//! A pipeline with neither a post-process stage nor an explicit
//! intermediate directory collapses to a plain single-stage build straight
//! into the output directory.

use crate::builder::Builder;
use crate::error::BuildError;
use crate::processor::BuildSummary;
use std::path::{Path, PathBuf};

/// Sequences one or two builder stages through an intermediate directory.
pub struct Pipeline {
    primary: Builder,
    post_process: Option<Builder>,
    intermediate_dir: Option<PathBuf>,
    clean_output: bool,
}

impl Pipeline {
    /// Create a single-stage pipeline.
    pub fn new(primary: Builder) -> Self {
        Self { primary, post_process: None, intermediate_dir: None, clean_output: false }
    }

    /// Add a post-process stage, run from the intermediate directory into
    /// the final output.
    pub fn with_post_process(mut self, builder: Builder) -> Self {
        self.post_process = Some(builder);
        self
    }

    /// Override the intermediate directory.
    ///
    /// Default: a sibling of the output directory named `<output>-intermediate`.
    pub fn with_intermediate_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.intermediate_dir = Some(dir.into());
        self
    }

    /// Clean the final output directory before building.
    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean_output = clean;
        self
    }

    /// Whether this pipeline has a post-process stage.
    pub fn has_post_process(&self) -> bool {
        self.post_process.is_some()
    }

    /// Run the pipeline. Returns the built/skipped/failed tally summed
    /// across all stages (zero failures = success). Failed clean removals
    /// count as failures.
    pub fn run(
        &self,
        profile: &str,
        threads: usize,
        source_dir: &Path,
        output_dir: &Path,
    ) -> Result<BuildSummary, BuildError> {
        let mut total = BuildSummary::new();

        if self.clean_output {
            println!("Cleaning output directory");
            total.failed += Builder::clean(output_dir);
        }

        // Single stage, no intermediate requested: build straight to output.
        if self.post_process.is_none() && self.intermediate_dir.is_none() {
            let summary = self.primary.run(profile, threads, source_dir, output_dir)?;
            report_stage("Build", summary);
            return Ok(total + summary);
        }

        let intermediate = match &self.intermediate_dir {
            Some(dir) => dir.clone(),
            None => default_intermediate_dir(output_dir),
        };

        let summary = self.primary.run(profile, threads, source_dir, &intermediate)?;
        report_stage("Primary stage", summary);
        if summary.failed > 0 {
            // Gate: the post-process stage never runs against partial content
            return Ok(total + summary);
        }
        total += summary;

        match &self.post_process {
            Some(post) => {
                let summary = post.run(profile, threads, &intermediate, output_dir)?;
                report_stage("Post-process stage", summary);
                total += summary;
            }
            None => {
                let summary = copy_tree(&intermediate, output_dir);
                report_stage("Copy stage", summary);
                total += summary;
            }
        }

        Ok(total)
    }
}

/// Default intermediate directory: a sibling of the output directory.
fn default_intermediate_dir(output_dir: &Path) -> PathBuf {
    let mut name = output_dir.file_name().unwrap_or_default().to_os_string();
    name.push("-intermediate");
    output_dir.with_file_name(name)
}

/// Print a stage summary line.
fn report_stage(stage: &str, summary: BuildSummary) {
    let status = if summary.failed == 0 { "successful" } else { "failed" };
    println!("{} {} - {}", stage, status, summary);
}

/// Recursively copy every file under `src` into `dst`, preserving
/// relative paths. Each failed copy is logged and counted; siblings are
/// not aborted.
pub fn copy_tree(src: &Path, dst: &Path) -> BuildSummary {
    let entries = match std::fs::read_dir(src) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("ERROR: failed to read {}: {}", src.display(), e);
            return BuildSummary { built: 0, skipped: 0, failed: 1 };
        }
    };

    let mut summary = BuildSummary::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                eprintln!("ERROR: failed to read entry under {}: {}", src.display(), e);
                summary.failed += 1;
                continue;
            }
        };

        let from = entry.path();
        let to = dst.join(entry.file_name());

        if from.is_dir() {
            summary += copy_tree(&from, &to);
        } else {
            let copied = std::fs::create_dir_all(dst).and_then(|_| std::fs::copy(&from, &to));
            match copied {
                Ok(_) => summary.built += 1,
                Err(e) => {
                    eprintln!("ERROR: failed to copy {}: {}", from.display(), e);
                    summary.failed += 1;
                }
            }
        }
    }
    summary
}
