//! Configuration for the catalog file location.
//!
//! The catalog file path is the only setting. Sources (highest priority first):
//! 1. `--file` flag or BOOKSHOP_FILE environment variable
//! 2. Config file (.bookshop/config.yaml)
//! 3. Default (books.txt in the current directory)
//!
//! Config file discovery:
//! - Searches current directory and parents for .bookshop/config.yaml
//! - A relative `file` is resolved against the directory holding .bookshop/

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Environment variable naming the catalog file
pub const FILE_ENV: &str = "BOOKSHOP_FILE";

/// Catalog file used when nothing else is configured
pub const DEFAULT_FILE: &str = "books.txt";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Catalog file path
    pub file: Option<String>,
}

/// Where the resolved catalog path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSource {
    /// `--file` flag or environment variable
    Override,

    /// `file` key of a config file
    ConfigFile,

    /// Built-in default
    Default,
}

impl fmt::Display for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSource::Override => write!(f, "--file / {}", FILE_ENV),
            FileSource::ConfigFile => write!(f, "config file"),
            FileSource::Default => write!(f, "default"),
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Catalog file path
    pub file: PathBuf,

    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,

    /// Which source supplied `file`
    pub source: FileSource,
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".bookshop").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    // An empty YAML document parses as null
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Resolve configuration, searching for a config file from `start`
pub fn resolve_from(start: &Path, file_override: Option<PathBuf>) -> Result<ResolvedConfig> {
    let config_file = find_config_file(start);

    let (file, source) = if let Some(file) = file_override {
        (file, FileSource::Override)
    } else if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;

        // Base directory is the parent of .bookshop/
        let base_dir = config_path
            .parent()
            .and_then(|p| p.parent())
            .unwrap_or(Path::new("."));

        match config.file {
            Some(ref file) => (resolve_path(base_dir, file), FileSource::ConfigFile),
            None => (PathBuf::from(DEFAULT_FILE), FileSource::Default),
        }
    } else {
        (PathBuf::from(DEFAULT_FILE), FileSource::Default)
    };

    debug!(file = %file.display(), source = %source, "Resolved catalog file");

    Ok(ResolvedConfig {
        file,
        config_file,
        source,
    })
}

/// Resolve configuration from the current directory.
///
/// `file_override` carries the `--file` flag, which clap also fills from
/// the environment variable.
pub fn resolve(file_override: Option<PathBuf>) -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    resolve_from(&cwd, file_override)
}
