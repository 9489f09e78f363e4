//! Integration tests for rule matching, staleness, and error accounting.
//!
//! Covers the single-asset engine guarantees end to end:
//! - a second run over unchanged inputs performs zero transforms
//! - touching an input (or just its sidecar) rebuilds exactly that unit
//! - one failing unit does not stop its siblings
//! - exclude patterns subtract from the include set
//! - clean removes contents but keeps the directory

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use assetpipe::processor::{
    CopyProcessor, SingleAsset, SingleAssetProcessor, TypedAsset, TypedAssetProcessor,
};
use assetpipe::{BuildOptions, BuildSummary, Builder, InputFile, Matcher, ProcessError};

// ============================================================================
// Test Utilities
// ============================================================================

fn setup() -> (TempDir, PathBuf, PathBuf) {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("assets");
    let out = temp.path().join("build");
    fs::create_dir_all(&src).unwrap();
    (temp, src, out)
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Push a file's mtime into the future so it is strictly newer than any
/// output produced earlier in the test.
fn touch(path: &Path) {
    let future = SystemTime::now() + Duration::from_secs(60);
    File::options().write(true).open(path).unwrap().set_modified(future).unwrap();
}

/// Copies files while counting transform invocations.
struct CountingCopy {
    invocations: Arc<AtomicUsize>,
}

impl CountingCopy {
    fn new() -> (Self, Arc<AtomicUsize>) {
        let invocations = Arc::new(AtomicUsize::new(0));
        (Self { invocations: Arc::clone(&invocations) }, invocations)
    }
}

impl SingleAssetProcessor for CountingCopy {
    fn process_file(
        &self,
        input: &InputFile,
        output: &Path,
        _options: &BuildOptions,
    ) -> Result<(), ProcessError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        fs::copy(&input.path, output)?;
        Ok(())
    }
}

// ============================================================================
// Staleness
// ============================================================================

/// Backdate a file so outputs created afterwards compare strictly newer,
/// regardless of the filesystem's mtime resolution.
fn backdate(path: &Path) {
    let past = SystemTime::now() - Duration::from_secs(3600);
    File::options().write(true).open(path).unwrap().set_modified(past).unwrap();
}

#[test]
fn second_run_on_unchanged_inputs_does_nothing() {
    let (_temp, src, out) = setup();
    backdate(&write_file(&src, "a.txt", "a"));
    backdate(&write_file(&src, "sub/b.txt", "b"));

    let (processor, invocations) = CountingCopy::new();
    let mut builder = Builder::new();
    builder.add_rule("*.txt", SingleAsset::new(processor));

    assert_eq!(
        builder.run("default", 2, &src, &out).unwrap(),
        BuildSummary { built: 2, skipped: 0, failed: 0 }
    );
    assert_eq!(invocations.load(Ordering::SeqCst), 2);

    // Unchanged inputs: every unit skips as up to date
    assert_eq!(
        builder.run("default", 2, &src, &out).unwrap(),
        BuildSummary { built: 0, skipped: 2, failed: 0 }
    );
    assert_eq!(invocations.load(Ordering::SeqCst), 2);
}

#[test]
fn touching_input_rebuilds_exactly_that_unit() {
    let (_temp, src, out) = setup();
    let a = write_file(&src, "a.txt", "a");
    write_file(&src, "b.txt", "b");

    let (processor, invocations) = CountingCopy::new();
    let mut builder = Builder::new();
    builder.add_rule("*.txt", SingleAsset::new(processor));

    builder.run("default", 2, &src, &out).unwrap();
    assert_eq!(invocations.load(Ordering::SeqCst), 2);

    touch(&a);
    builder.run("default", 2, &src, &out).unwrap();
    assert_eq!(invocations.load(Ordering::SeqCst), 3);
}

#[test]
fn touching_only_the_sidecar_rebuilds_the_unit() {
    let (_temp, src, out) = setup();
    write_file(&src, "a.txt", "a");
    let meta = write_file(&src, "a.txt.meta", "{}");

    let (processor, invocations) = CountingCopy::new();
    let mut builder = Builder::new();
    builder.add_rule("*.txt", SingleAsset::new(processor));

    builder.run("default", 1, &src, &out).unwrap();
    assert_eq!(invocations.load(Ordering::SeqCst), 1);

    touch(&meta);
    builder.run("default", 1, &src, &out).unwrap();
    assert_eq!(invocations.load(Ordering::SeqCst), 2);
}

#[test]
fn missing_output_is_rebuilt() {
    let (_temp, src, out) = setup();
    write_file(&src, "a.txt", "a");

    let (processor, invocations) = CountingCopy::new();
    let mut builder = Builder::new();
    builder.add_rule("*.txt", SingleAsset::new(processor));

    builder.run("default", 1, &src, &out).unwrap();
    fs::remove_file(out.join("a.txt")).unwrap();

    builder.run("default", 1, &src, &out).unwrap();
    assert_eq!(invocations.load(Ordering::SeqCst), 2);
    assert!(out.join("a.txt").exists());
}

// ============================================================================
// Error Isolation
// ============================================================================

#[test]
fn one_failure_among_many_counts_one_and_builds_the_rest() {
    struct FailOn {
        name: &'static str,
    }

    impl SingleAssetProcessor for FailOn {
        fn process_file(
            &self,
            input: &InputFile,
            output: &Path,
            _options: &BuildOptions,
        ) -> Result<(), ProcessError> {
            if input.path.ends_with(self.name) {
                return Err(ProcessError::failed("synthetic failure"));
            }
            fs::copy(&input.path, output)?;
            Ok(())
        }
    }

    let (_temp, src, out) = setup();
    for i in 0..5 {
        write_file(&src, &format!("f{}.txt", i), "x");
    }

    let mut builder = Builder::new();
    builder.add_rule("*.txt", SingleAsset::new(FailOn { name: "f2.txt" }));

    let summary = builder.run("default", 4, &src, &out).unwrap();
    assert_eq!(summary, BuildSummary { built: 4, skipped: 0, failed: 1 });
    for i in [0, 1, 3, 4] {
        assert!(out.join(format!("f{}.txt", i)).exists());
    }
    assert!(!out.join("f2.txt").exists());
}

// ============================================================================
// Matching
// ============================================================================

#[test]
fn exclude_pattern_subtracts_from_include_set() {
    let (_temp, src, out) = setup();
    write_file(&src, "a.png", "a");
    write_file(&src, "b.pack.png", "b");

    let mut builder = Builder::new();
    builder.add_rule(
        Matcher::new("*.png").with_exclude("*.pack.png"),
        SingleAsset::new(CopyProcessor),
    );

    assert_eq!(builder.run("default", 1, &src, &out).unwrap().failed, 0);
    assert!(out.join("a.png").exists());
    assert!(!out.join("b.pack.png").exists());
}

#[test]
fn sidecars_are_never_inputs_even_for_wildcard_rules() {
    let (_temp, src, out) = setup();
    write_file(&src, "a.txt", "a");
    write_file(&src, "a.txt.meta", "{}");

    let mut builder = Builder::new();
    builder.add_rule("*", SingleAsset::new(CopyProcessor));

    assert_eq!(builder.run("default", 1, &src, &out).unwrap().failed, 0);
    assert!(out.join("a.txt").exists());
    assert!(!out.join("a.txt.meta").exists());
}

// ============================================================================
// Metadata Defaults
// ============================================================================

#[test]
fn input_without_sidecar_gets_declared_default_verbatim() {
    #[derive(Debug, Clone, PartialEq, serde::Deserialize)]
    struct Meta {
        quality: u32,
        label: String,
    }

    struct MetaEcho;

    impl TypedAssetProcessor for MetaEcho {
        type Metadata = Meta;

        fn default_metadata(&self) -> Meta {
            Meta { quality: 80, label: "standard".to_string() }
        }

        fn process_file(
            &self,
            _input: &InputFile,
            metadata: Meta,
            output: &Path,
            _options: &BuildOptions,
        ) -> Result<(), ProcessError> {
            fs::write(output, format!("{}:{}", metadata.quality, metadata.label))?;
            Ok(())
        }
    }

    let (_temp, src, out) = setup();
    write_file(&src, "a.txt", "a");

    let mut builder = Builder::new();
    builder.add_rule("*.txt", TypedAsset::new(MetaEcho));
    assert_eq!(builder.run("default", 1, &src, &out).unwrap().failed, 0);

    // Byte-for-byte the declared default
    assert_eq!(fs::read_to_string(out.join("a.txt")).unwrap(), "80:standard");
}

// ============================================================================
// Clean
// ============================================================================

#[test]
fn clean_on_missing_directory_is_a_noop() {
    let (temp, _src, _out) = setup();
    assert_eq!(Builder::clean(&temp.path().join("never-created")), 0);
}

#[test]
fn clean_empties_the_directory_but_keeps_it() {
    let (_temp, _src, out) = setup();
    write_file(&out, "a.bin", "x");
    write_file(&out, "deep/b.bin", "y");

    assert_eq!(Builder::clean(&out), 0);
    assert!(out.is_dir());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}
