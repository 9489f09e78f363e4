//! Command-line surface for pipeline executables.
//!
//! The engine is a library; an executable registers its rules on a
//! [`Pipeline`] and hands it to [`run`], which parses arguments, applies
//! `pipe.toml` defaults, and maps the run's failure count onto the process
//! exit code: 0 = success, 1-254 = number of failed units (saturated),
//! 255 = invalid invocation.

use crate::config::{load_config, merge_cli_overrides, CliOverrides};
use crate::error::{BuildError, MatchError};
use crate::pipeline::Pipeline;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Everything built (or nothing needed building).
pub const EXIT_SUCCESS: u8 = 0;
/// Invalid invocation: bad arguments or unresolvable directories.
pub const EXIT_INVALID_ARGS: u8 = 255;
/// Error counts above this saturate, so they never collide with the
/// invalid-invocation code.
const MAX_ERROR_EXIT: usize = 254;

/// Assetpipe - process a source tree of content files into an output tree
#[derive(Parser, Debug)]
#[command(name = "apipe")]
#[command(about = "Rule-driven asset build pipeline")]
#[command(version)]
pub struct Args {
    /// Source directory containing files to process
    pub srcdir: Option<PathBuf>,

    /// Output directory to write files to
    pub dstdir: Option<PathBuf>,

    /// Limit number of concurrent workers (default: host core count)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Build profile name threaded through processors
    #[arg(long)]
    pub profile: Option<String>,

    /// Clean the output directory before building
    #[arg(long)]
    pub clean: bool,

    /// Intermediate directory for multi-stage pipelines
    #[arg(long)]
    pub intermediate: Option<PathBuf>,
}

/// Parse arguments and run the pipeline, mapping the outcome to an exit
/// code.
pub fn run(pipeline: Pipeline) -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version print and succeed; real usage errors
            // get the distinguished invalid-invocation code.
            let code = match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    EXIT_SUCCESS
                }
                _ => EXIT_INVALID_ARGS,
            };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    ExitCode::from(execute(args, pipeline))
}

/// Run a parsed invocation. Split from [`run`] so tests can drive it.
pub fn execute(args: Args, pipeline: Pipeline) -> u8 {
    let mut config = match load_config(None) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("INVALID USAGE: {}", e);
            return EXIT_INVALID_ARGS;
        }
    };

    let overrides = CliOverrides {
        src: args.srcdir,
        out: args.dstdir,
        intermediate: args.intermediate,
        profile: args.profile,
        threads: args.threads,
        clean: args.clean,
    };
    merge_cli_overrides(&mut config, &overrides);

    let Some(srcdir) = config.build.src else {
        eprintln!("INVALID USAGE: no source directory (pass srcdir or set build.src in pipe.toml)");
        return EXIT_INVALID_ARGS;
    };
    let Some(dstdir) = config.build.out else {
        eprintln!("INVALID USAGE: no output directory (pass dstdir or set build.out in pipe.toml)");
        return EXIT_INVALID_ARGS;
    };

    let threads = config.build.threads.unwrap_or_else(default_threads);
    if threads == 0 {
        eprintln!("INVALID USAGE: expected number >0 for threads argument");
        return EXIT_INVALID_ARGS;
    }

    let profile = config.build.profile.unwrap_or_else(|| "default".to_string());

    let mut pipeline = pipeline.with_clean(config.build.clean);
    if let Some(dir) = config.build.intermediate {
        pipeline = pipeline.with_intermediate_dir(dir);
    }

    println!("Building using {} worker(s)", threads);
    match pipeline.run(&profile, threads, &srcdir, &dstdir) {
        Ok(summary) => summary.failed.min(MAX_ERROR_EXIT) as u8,
        // An unusable source tree is an invocation problem, not a unit
        // failure, and gets the distinguished code.
        Err(BuildError::Match(MatchError::RootNotFound(path))) => {
            eprintln!("INVALID USAGE: source directory not found: {}", path.display());
            EXIT_INVALID_ARGS
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            1
        }
    }
}

/// Default worker count: host core count.
fn default_threads() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}
