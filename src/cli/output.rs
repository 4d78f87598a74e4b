//! Console output for dircombine
//!
//! Progress lines go to stdout, errors to stderr. Quiet mode silences
//! everything except errors.

use console::style;

/// Output handler for consistent CLI formatting
#[derive(Debug, Clone, Copy)]
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    /// Create a new output handler
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        // Errors are always shown, even in quiet mode
        eprintln!("{} {}", style("✖").red(), message);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Announce a file being embedded
    pub fn processing(&self, relative: &str) {
        if !self.quiet {
            println!("{} Processing: {}", style("❯").cyan(), relative);
        }
    }

    /// Announce a file a dry run would embed
    pub fn would_include(&self, relative: &str) {
        if !self.quiet {
            println!("{} Would include: {}", style("❯").cyan(), relative);
        }
    }

    /// Report a skipped file
    pub fn skip(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("-").dim(), style(message).dim());
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    /// Print a verbose breakdown item
    pub fn verbose_breakdown(&self, label: &str, count: usize) {
        if self.verbose && !self.quiet {
            println!(
                "  {} {} {}",
                style("•").cyan(),
                style(count.to_string()).yellow().bold(),
                style(label).dim()
            );
        }
    }

    /// Get verbose mode status
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Print blank line
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }
}
