//! Configuration management for dircombine
//!
//! Settings are layered with figment: built-in defaults, then user and
//! repository config files, then an explicit `--config` file, then
//! `DIRCOMBINE_*` environment variables. The merged result is extracted into
//! [`CombineConfig`], which is immutable for the rest of the run.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

mod load;
pub mod defaults;
mod smart_load;

/// Effective configuration for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombineConfig {
    /// Output file path used when `-o` is not given
    pub output: String,

    /// How undecodable bytes are handled
    pub decode: DecodePolicy,

    /// Ignore lists
    pub ignore: IgnoreConfig,

    /// Traversal behaviour
    pub walk: WalkConfig,
}

/// Ignore lists applied during the walk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Directory names pruned before descending (exact match)
    pub directories: Vec<String>,

    /// File names skipped (exact match)
    pub files: Vec<String>,

    /// File extensions skipped (case-insensitive, leading dot optional)
    pub extensions: Vec<String>,

    /// Glob patterns matched against `/`-separated relative paths
    pub patterns: Vec<String>,
}

/// Traversal options handed to the walker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Follow symbolic links while walking
    pub follow_links: bool,

    /// Also honour `.gitignore` and `.ignore` files
    pub respect_gitignore: bool,
}

/// Lossy decoding policy for file content.
///
/// Content is always decoded as UTF-8 and decoding never fails. Each maximal
/// invalid byte sequence is either replaced by U+FFFD or removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Substitute U+FFFD for every invalid sequence
    #[default]
    Replace,
    /// Silently remove invalid sequences
    Drop,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            output: defaults::DEFAULT_OUTPUT.to_string(),
            decode: DecodePolicy::default(),
            ignore: IgnoreConfig::default(),
            walk: WalkConfig::default(),
        }
    }
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            directories: defaults::owned(defaults::IGNORED_DIRECTORIES),
            files: defaults::owned(defaults::IGNORED_FILES),
            extensions: defaults::owned(defaults::IGNORED_EXTENSIONS),
            patterns: vec![],
        }
    }
}
