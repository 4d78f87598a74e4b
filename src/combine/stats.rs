//! Counters for a single combine run

use super::filters::SkipReason;

/// Per-reason skip counts, reported in verbose mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipBreakdown {
    pub ignored_name: usize,
    pub ignored_extension: usize,
    pub excluded_by_pattern: usize,
    pub output_file: usize,
    pub read_errors: usize,
}

impl SkipBreakdown {
    /// Non-zero buckets in reporting order
    pub fn entries(&self) -> Vec<(SkipReason, usize)> {
        [
            (SkipReason::IgnoredName, self.ignored_name),
            (SkipReason::IgnoredExtension, self.ignored_extension),
            (SkipReason::ExcludedByPattern, self.excluded_by_pattern),
            (SkipReason::OutputFile, self.output_file),
            (SkipReason::ReadError, self.read_errors),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect()
    }
}

/// Result of a combine run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombineStats {
    /// Files embedded in the output (or that would be, for a dry run)
    pub processed: usize,
    /// Files seen but not embedded, for any reason
    pub skipped: usize,
    /// Processed files whose content needed lossy decoding
    pub lossy: usize,
    /// Bytes written to the output, header and footer included
    pub bytes_written: u64,
    pub skipped_by: SkipBreakdown,
}

impl CombineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_processed(&mut self, lossy: bool) {
        self.processed += 1;
        if lossy {
            self.lossy += 1;
        }
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        self.skipped += 1;
        let bucket = match reason {
            SkipReason::IgnoredName => &mut self.skipped_by.ignored_name,
            SkipReason::IgnoredExtension => &mut self.skipped_by.ignored_extension,
            SkipReason::ExcludedByPattern => &mut self.skipped_by.excluded_by_pattern,
            SkipReason::OutputFile => &mut self.skipped_by.output_file,
            SkipReason::ReadError => &mut self.skipped_by.read_errors,
        };
        *bucket += 1;
    }

    /// Every file entry encountered outside pruned directories
    pub fn files_seen(&self) -> usize {
        self.processed + self.skipped
    }
}
