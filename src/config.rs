//! Configuration loading and discovery for `pipe.toml`
//!
//! Provides functions to find, load, and merge configuration. The config
//! file supplies defaults for a build invocation; CLI arguments always
//! win over config values.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file name searched for by [`find_config`].
pub const CONFIG_FILE: &str = "pipe.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse pipe.toml: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level `pipe.toml` schema.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipeConfig {
    /// The `[build]` table
    #[serde(default)]
    pub build: BuildConfig,
}

/// The `[build]` table: defaults for a build invocation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Default source directory
    pub src: Option<PathBuf>,
    /// Default output directory
    pub out: Option<PathBuf>,
    /// Default intermediate directory for multi-stage pipelines
    pub intermediate: Option<PathBuf>,
    /// Default build profile name
    pub profile: Option<String>,
    /// Default worker thread count
    pub threads: Option<usize>,
    /// Clean the output directory before building
    #[serde(default)]
    pub clean: bool,
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override source directory
    pub src: Option<PathBuf>,
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Override intermediate directory
    pub intermediate: Option<PathBuf>,
    /// Override build profile name
    pub profile: Option<String>,
    /// Override worker thread count
    pub threads: Option<usize>,
    /// Force a clean before building
    pub clean: bool,
}

/// Find pipe.toml by walking up from the current working directory.
///
/// # Returns
/// - `Some(path)` if a pipe.toml file is found
/// - `None` if no config file is found
pub fn find_config() -> Option<PathBuf> {
    let mut dir = env::current_dir().ok()?;
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Load configuration from a specific path, or from discovery when `None`.
///
/// With no path and no discoverable pipe.toml, returns the defaults.
pub fn load_config(path: Option<&Path>) -> Result<PipeConfig, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match find_config() {
            Some(path) => path,
            None => return Ok(default_config()),
        },
    };

    let text = fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}

/// The default configuration (everything unset).
pub fn default_config() -> PipeConfig {
    PipeConfig::default()
}

/// Apply CLI overrides on top of a loaded config. CLI values win.
pub fn merge_cli_overrides(config: &mut PipeConfig, overrides: &CliOverrides) {
    if overrides.src.is_some() {
        config.build.src = overrides.src.clone();
    }
    if overrides.out.is_some() {
        config.build.out = overrides.out.clone();
    }
    if overrides.intermediate.is_some() {
        config.build.intermediate = overrides.intermediate.clone();
    }
    if overrides.profile.is_some() {
        config.build.profile = overrides.profile.clone();
    }
    if overrides.threads.is_some() {
        config.build.threads = overrides.threads;
    }
    if overrides.clean {
        config.build.clean = true;
    }
}
