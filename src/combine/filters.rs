//! Ignore rules applied while walking
//!
//! Directory names are checked before descending (pruning), everything else
//! is checked per file before any content is read.

use crate::config::IgnoreConfig;
use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::Path;

/// Decision for whether to process or skip a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Read the file and embed it
    Process,
    /// Skip the file with a reason
    Skip(SkipReason),
}

/// Why a file did not end up in the combined output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    IgnoredName,
    IgnoredExtension,
    ExcludedByPattern,
    OutputFile,
    ReadError,
}

impl SkipReason {
    /// Progress line printed when a file is skipped
    pub fn message(&self, file_name: &str, relative: &str, path: &Path) -> String {
        match self {
            SkipReason::IgnoredName => format!("Skipping ignored file: {file_name}"),
            SkipReason::IgnoredExtension => {
                format!("Skipping file with ignored extension: {file_name}")
            }
            SkipReason::ExcludedByPattern => {
                format!("Skipping file excluded by pattern: {relative}")
            }
            SkipReason::OutputFile => {
                format!("Skipping the output file itself: {}", path.display())
            }
            SkipReason::ReadError => format!("Skipping unreadable file: {}", path.display()),
        }
    }

    /// Short label used in the verbose summary breakdown
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::IgnoredName => "ignored by name",
            SkipReason::IgnoredExtension => "ignored by extension",
            SkipReason::ExcludedByPattern => "excluded by pattern",
            SkipReason::OutputFile => "output file",
            SkipReason::ReadError => "read errors",
        }
    }
}

/// Immutable ignore rules for one run
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    directories: HashSet<String>,
    files: HashSet<String>,
    extensions: HashSet<String>,
    patterns: GlobSet,
}

impl IgnoreRules {
    /// Build rules from configuration, compiling exclude globs up front
    pub fn new(config: &IgnoreConfig) -> Result<Self> {
        let rules = Self {
            directories: config.directories.iter().cloned().collect(),
            files: config.files.iter().cloned().collect(),
            extensions: config
                .extensions
                .iter()
                .map(|ext| normalize_extension(ext))
                .filter(|ext| !ext.is_empty())
                .collect(),
            patterns: compile_glob_patterns(&config.patterns)?,
        };

        tracing::debug!(
            "Built ignore rules: {} directories, {} files, {} extensions, {} patterns",
            rules.directories.len(),
            rules.files.len(),
            rules.extensions.len(),
            rules.patterns.len()
        );
        Ok(rules)
    }

    /// Rules that ignore nothing
    pub fn empty() -> Self {
        Self {
            directories: HashSet::new(),
            files: HashSet::new(),
            extensions: HashSet::new(),
            patterns: GlobSet::empty(),
        }
    }

    /// Whether a directory with this name must be pruned
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.directories.contains(name)
    }

    /// Whether a `/`-separated relative path matches an exclude glob
    pub fn is_excluded(&self, relative: &str) -> bool {
        !self.patterns.is_empty() && self.patterns.is_match(relative)
    }

    /// Classify a file by name, extension and relative path
    pub fn check_file(&self, file_name: &str, relative: &str) -> FilterDecision {
        if self.files.contains(file_name) {
            return FilterDecision::Skip(SkipReason::IgnoredName);
        }

        let extension = Path::new(file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());
        if let Some(ext) = extension {
            if self.extensions.contains(&ext) {
                return FilterDecision::Skip(SkipReason::IgnoredExtension);
            }
        }

        if self.is_excluded(relative) {
            return FilterDecision::Skip(SkipReason::ExcludedByPattern);
        }

        FilterDecision::Process
    }
}

/// Lowercase and strip the leading dot, so ".PNG" and "png" are the same rule
fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

fn compile_glob_patterns(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("Invalid glob pattern '{}': {}", pattern, e))?;
        builder.add(glob);
    }

    builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build GlobSet: {}", e))
}
