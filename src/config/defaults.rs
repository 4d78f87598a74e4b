//! Built-in ignore lists
//!
//! These are the entries every run starts from. Config files may replace a
//! list entirely, CLI flags only ever add to it.

/// Directory names whose whole subtree is pruned from the walk
pub const IGNORED_DIRECTORIES: &[&str] = &[
    // Version control
    ".git",
    // IDE
    ".vscode",
    // Python
    "__pycache__",
    "venv",
    ".venv",
    "env",
    ".env",
    // Node.js/JavaScript
    "node_modules",
    "build",
    "dist",
    // Rust
    "target",
    // Generic
    "logs",
];

/// Exact file names that are never embedded
pub const IGNORED_FILES: &[&str] = &[
    ".DS_Store",
    "package-lock.json",
    "yarn.lock",
    "poetry.lock",
    "Pipfile.lock",
];

/// File extensions (lowercase, without the dot) that are never embedded
pub const IGNORED_EXTENSIONS: &[&str] = &[
    // Bytecode and compiled objects
    "pyc", "pyo", "class", "o", "so", "dll", "exe",
    // Logs, locks, editor swap files
    "log", "lock", "swp", "swo",
    // Images
    "png", "jpg", "jpeg", "gif", "bmp", "tiff",
    // Documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx",
    // Archives
    "zip", "tar", "gz", "rar", "7z",
    // Media
    "mp3", "wav", "ogg", "mp4", "avi", "mov", "mkv",
];

/// Output file name used when neither the CLI nor a config file names one
pub const DEFAULT_OUTPUT: &str = "combined_code.txt";

pub(crate) fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions_are_normalized() {
        for ext in IGNORED_EXTENSIONS {
            assert!(!ext.starts_with('.'), "extension {ext} should not carry a dot");
            assert_eq!(*ext, ext.to_lowercase());
        }
    }

    #[test]
    fn test_common_entries_present() {
        assert!(IGNORED_DIRECTORIES.contains(&".git"));
        assert!(IGNORED_DIRECTORIES.contains(&"node_modules"));
        assert!(IGNORED_FILES.contains(&".DS_Store"));
        assert!(IGNORED_EXTENSIONS.contains(&"png"));
    }
}
