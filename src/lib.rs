//! # dircombine - Combine a directory tree into one text file
//!
//! dircombine walks a directory, skips build output, dependency caches,
//! lockfiles and binary formats, and writes every remaining file into a single
//! artifact delimited by path headers. The artifact is handy for code review
//! or for feeding a whole codebase to another tool.
//!
//! ## Quick Start
//!
//! ```bash
//! # Combine the current project into combined_code.txt
//! dircombine .
//!
//! # Choose the output file and add extra exclusions
//! dircombine src -o bundle.txt --ignore-dir fixtures --exclude '**/*.snap'
//!
//! # See what would be included
//! dircombine . --dry-run
//! ```
//!
//! ## Output Format
//!
//! ```text
//! # Combined content from directory: /abs/project
//! # Output file: /abs/project/combined_code.txt
//! # --- START OF COMBINED CONTENT ---
//!
//! --- START FILE: src/main.rs ---
//! fn main() {}
//! --- END FILE: src/main.rs ---
//!
//! # --- END OF COMBINED CONTENT ---
//! ```
//!
//! ## Configuration
//!
//! Ignore lists and defaults can be set in `dircombine.toml` (or `.json`,
//! `.yaml`, `.yml`) in the working directory, in
//! `~/.config/dircombine/config.toml`, or through `DIRCOMBINE_*` environment
//! variables:
//!
//! ```toml
//! output = "bundle.txt"
//! decode = "drop"
//!
//! [ignore]
//! directories = [".git", "target", "vendor"]
//! patterns = ["**/*.snap"]
//!
//! [walk]
//! respect_gitignore = true
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use dircombine::{CombineConfig, Combiner, Output};
//! use std::path::Path;
//!
//! let config = CombineConfig::load()?;
//! let combiner = Combiner::new(&config)?;
//! let stats = combiner.combine(Path::new("src"), Path::new("bundle.txt"), &Output::new(false, true))?;
//! println!("combined {} files", stats.processed);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod combine;
pub mod config;

pub use cli::{Cli, Output};
pub use combine::{CombineStats, Combiner, validate_root};
pub use config::{CombineConfig, DecodePolicy};
