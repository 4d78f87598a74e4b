//! Directory combining
//!
//! A [`Combiner`] walks one root directory, prunes ignored directories,
//! filters files by name, extension and exclude pattern, and appends the text
//! of every remaining file to a single artifact. A file that cannot be read is
//! reported and skipped; only an invalid root or an unwritable output aborts
//! the run.

pub mod filters;
pub mod stats;
pub mod walker;
pub mod writer;

pub use filters::{FilterDecision, IgnoreRules, SkipReason};
pub use stats::{CombineStats, SkipBreakdown};
pub use walker::relative_path;
pub use writer::{CombinedWriter, decode_content};

use crate::cli::Output;
use crate::config::{CombineConfig, DecodePolicy, WalkConfig};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A file that survived every filter
#[derive(Debug)]
pub struct Candidate<'a> {
    /// Path as produced by the walker
    pub path: &'a Path,
    /// `/`-separated path relative to the root
    pub relative: &'a str,
}

/// Walks a directory and writes the combined artifact
#[derive(Debug, Clone)]
pub struct Combiner {
    rules: Arc<IgnoreRules>,
    walk: WalkConfig,
    decode: DecodePolicy,
}

impl Combiner {
    /// Create a combiner from the effective configuration
    pub fn new(config: &CombineConfig) -> Result<Self> {
        let rules = IgnoreRules::new(&config.ignore).context("Invalid ignore configuration")?;
        Ok(Self::with_rules(rules, config.walk.clone(), config.decode))
    }

    /// Create a combiner from prebuilt rules
    pub fn with_rules(rules: IgnoreRules, walk: WalkConfig, decode: DecodePolicy) -> Self {
        Self {
            rules: Arc::new(rules),
            walk,
            decode,
        }
    }

    /// Combine every candidate under `root` into `output_path`.
    ///
    /// The root is validated before the output is created, so an invalid root
    /// never leaves a file behind.
    pub fn combine(&self, root: &Path, output_path: &Path, out: &Output) -> Result<CombineStats> {
        let root = validate_root(root)?;

        let file = File::create(output_path).with_context(|| {
            format!("Error opening or writing to output file {}", output_path.display())
        })?;
        let output_abs = absolute_path(output_path);
        tracing::info!(
            "Combining {} into {}",
            root.display(),
            output_abs.display()
        );

        let mut writer = CombinedWriter::new(BufWriter::new(file));
        writer.write_header(&root, &output_abs)?;

        let mut stats = CombineStats::new();
        self.walk(&root, &output_abs, &mut stats, out, |candidate, stats| {
            match std::fs::read(candidate.path) {
                Ok(bytes) => {
                    let (content, lossy) = decode_content(&bytes, self.decode);
                    if lossy {
                        tracing::debug!("Lossy decode applied to {}", candidate.relative);
                    }
                    out.processing(candidate.relative);
                    writer.write_record(candidate.relative, &content)?;
                    stats.record_processed(lossy);
                }
                Err(e) => {
                    out.error(&format!(
                        "Error reading file {}: {}",
                        candidate.path.display(),
                        e
                    ));
                    stats.record_skip(SkipReason::ReadError);
                }
            }
            Ok(())
        })?;

        writer.write_footer()?;
        stats.bytes_written = writer.bytes_written();
        writer.finish()?;

        tracing::info!(
            "Combined {} files, skipped {}, wrote {} bytes",
            stats.processed,
            stats.skipped,
            stats.bytes_written
        );
        Ok(stats)
    }

    /// Walk and filter exactly like [`Combiner::combine`] without reading
    /// content or touching the output file
    pub fn dry_run(&self, root: &Path, output_path: &Path, out: &Output) -> Result<CombineStats> {
        let root = validate_root(root)?;
        let output_abs = absolute_path(output_path);

        let mut stats = CombineStats::new();
        self.walk(&root, &output_abs, &mut stats, out, |candidate, stats| {
            out.would_include(candidate.relative);
            stats.record_processed(false);
            Ok(())
        })?;
        Ok(stats)
    }

    /// Drive the walker, classify every file entry and hand candidates to
    /// `on_candidate` in traversal order
    fn walk<F>(
        &self,
        root: &Path,
        output_abs: &Path,
        stats: &mut CombineStats,
        out: &Output,
        mut on_candidate: F,
    ) -> Result<()>
    where
        F: FnMut(&Candidate<'_>, &mut CombineStats) -> Result<()>,
    {
        for result in walker::build_walker(root, &self.rules, &self.walk) {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("Error accessing path under {}: {}", root.display(), err);
                    out.error(&format!("Error walking directory: {err}"));
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue;
            }
            let is_symlink = entry.path_is_symlink();
            // Unfollowed symlinks to directories are not files either
            if entry.file_type().is_some_and(|ft| ft.is_dir())
                || (is_symlink && entry.path().is_dir())
            {
                continue;
            }

            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy();
            let relative = relative_path(path, root).unwrap_or_else(|| path.display().to_string());

            let mut decision = self.rules.check_file(&file_name, &relative);
            if decision == FilterDecision::Process && self.is_output_file(path, is_symlink, output_abs) {
                decision = FilterDecision::Skip(SkipReason::OutputFile);
            }
            tracing::trace!("{} -> {:?}", relative, decision);

            match decision {
                FilterDecision::Skip(reason) => {
                    out.skip(&reason.message(&file_name, &relative, path));
                    stats.record_skip(reason);
                }
                FilterDecision::Process => {
                    let candidate = Candidate {
                        path,
                        relative: &relative,
                    };
                    on_candidate(&candidate, stats)?;
                }
            }
        }

        Ok(())
    }

    /// Reading a symlink reads its target, so links are compared by their
    /// resolved path. Followed directory links can also respell the path.
    fn is_output_file(&self, path: &Path, is_symlink: bool, output_abs: &Path) -> bool {
        if path == output_abs {
            return true;
        }
        (is_symlink || self.walk.follow_links) && absolute_path(path) == output_abs
    }
}

/// Check that `root` exists and is a directory, returning its absolute form
pub fn validate_root(root: &Path) -> Result<PathBuf> {
    if !root.is_dir() {
        anyhow::bail!(
            "Input directory '{}' not found or is not a directory.",
            root.display()
        );
    }
    root.canonicalize()
        .with_context(|| format!("Failed to resolve input directory {}", root.display()))
}

/// Absolute, symlink-resolved form of a path that may not exist yet
pub fn absolute_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }

    if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        if let Ok(resolved) = parent.canonicalize() {
            return resolved.join(name);
        }
    }

    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
