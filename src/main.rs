//! Assetpipe - command-line tool for running a content build over a source tree
//!
//! The stock binary registers a single copy-everything rule; real projects
//! build their own binary against the library and register their own
//! processors.

use std::process::ExitCode;

use assetpipe::processor::{CopyProcessor, SingleAsset};
use assetpipe::{cli, Builder, Pipeline};

fn main() -> ExitCode {
    let mut builder = Builder::new();
    builder.add_rule("*", SingleAsset::new(CopyProcessor));

    cli::run(Pipeline::new(builder))
}
