//! Command-line interface for dircombine
//!
//! Parses arguments with clap, layers CLI overrides on top of the loaded
//! configuration, runs the [`Combiner`](crate::combine::Combiner) and prints
//! the run summary.

use anyhow::Result;
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::combine::{CombineStats, Combiner, validate_root};
use crate::config::{CombineConfig, DecodePolicy};

mod output;

pub use output::Output;

/// Combine all text files in a directory and its subdirectories into a single output file
#[derive(Parser, Debug)]
#[command(
    name = "dircombine",
    version,
    about = "Combine all text files in a directory and its subdirectories into a single output file",
    long_about = "Recursively walks INPUT_DIR, skips ignored directories, file names and \
                  extensions, and writes the content of every remaining file into one \
                  output file with path-delimited headers."
)]
pub struct Cli {
    /// The root directory containing the files to combine
    #[arg(value_name = "INPUT_DIR", required_unless_present = "print_config")]
    pub input_dir: Option<PathBuf>,

    /// The output file to create [default: combined_code.txt]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", env = "DIRCOMBINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Additional directory names to prune
    #[arg(long = "ignore-dir", value_name = "NAME", value_delimiter = ',')]
    pub ignore_dirs: Vec<String>,

    /// Additional file names to skip
    #[arg(long = "ignore-file", value_name = "NAME", value_delimiter = ',')]
    pub ignore_files: Vec<String>,

    /// Additional file extensions to skip
    #[arg(long = "ignore-ext", value_name = "EXT", value_delimiter = ',')]
    pub ignore_exts: Vec<String>,

    /// Glob patterns (relative to INPUT_DIR) to exclude
    #[arg(long, value_name = "GLOB", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// How to handle bytes that are not valid UTF-8
    #[arg(long, value_enum)]
    pub decode: Option<DecodePolicy>,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_links: bool,

    /// Also honour .gitignore and .ignore files
    #[arg(long)]
    pub gitignore: bool,

    /// List the files that would be combined without writing the output
    #[arg(long)]
    pub dry_run: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<ExitCode> {
        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);

        let mut config = CombineConfig::load_with_custom_config(self.config.as_deref())?;
        self.apply_overrides(&mut config);

        if self.print_config {
            print!("{}", config.to_toml()?);
            return Ok(ExitCode::SUCCESS);
        }

        let Some(input_dir) = self.input_dir.as_deref() else {
            anyhow::bail!("INPUT_DIR is required");
        };

        // Checked before anything is created on disk
        if let Err(err) = validate_root(input_dir) {
            output.error(&format!("Error: {err}"));
            return Ok(ExitCode::from(1));
        }

        let output_path = self
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.output));
        let combiner = Combiner::new(&config)?;

        if self.dry_run {
            let stats = combiner.dry_run(input_dir, &output_path, &output)?;
            output.blank_line();
            output.success(&format!(
                "Dry run: {} files would be combined into '{}'.",
                stats.processed,
                output_path.display()
            ));
            report_skips(&stats, &output);
        } else {
            let stats = combiner.combine(input_dir, &output_path, &output)?;
            report_summary(&stats, &output_path, &output);
        }

        Ok(ExitCode::SUCCESS)
    }

    /// CLI flags extend configured lists and override scalar settings
    fn apply_overrides(&self, config: &mut CombineConfig) {
        config.ignore.directories.extend(self.ignore_dirs.iter().cloned());
        config.ignore.files.extend(self.ignore_files.iter().cloned());
        config.ignore.extensions.extend(self.ignore_exts.iter().cloned());
        config.ignore.patterns.extend(self.exclude.iter().cloned());

        if let Some(decode) = self.decode {
            config.decode = decode;
        }
        if self.follow_links {
            config.walk.follow_links = true;
        }
        if self.gitignore {
            config.walk.respect_gitignore = true;
        }
        if let Some(path) = &self.output {
            config.output = path.display().to_string();
        }
    }
}

fn report_summary(stats: &CombineStats, output_path: &Path, output: &Output) {
    output.blank_line();
    output.success(&format!(
        "Successfully combined {} files into '{}'.",
        stats.processed,
        output_path.display()
    ));
    report_skips(stats, output);
    if stats.lossy > 0 {
        output.info(&format!(
            "Decoded {} files lossily (invalid UTF-8 bytes were replaced or dropped).",
            stats.lossy
        ));
    }
    output.verbose(&format!("Wrote {} bytes", stats.bytes_written));
}

fn report_skips(stats: &CombineStats, output: &Output) {
    if stats.skipped == 0 {
        return;
    }
    output.info(&format!(
        "Skipped {} files (ignored, binary, or read errors).",
        stats.skipped
    ));
    if output.is_verbose() {
        for (reason, count) in stats.skipped_by.entries() {
            output.verbose_breakdown(reason.label(), count);
        }
    }
}

/// Log directives for a `-v` count: our own crate gets louder first, the
/// walker and glob crates only join in at `-vvv`
fn log_directives(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,dircombine=info",
        2 => "warn,dircombine=debug",
        _ => "info,dircombine=trace,ignore=debug,globset=debug",
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_directives(verbose)));

    // Log lines share stderr with errors so stdout stays the progress stream
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose > 2)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        tracing::debug!("Logging already initialized");
    }
}
