use super::filters::IgnoreRules;
use crate::config::WalkConfig;
use ignore::{DirEntry, WalkBuilder};
use std::path::Path;
use std::sync::Arc;

/// Build a deterministic walker that prunes ignored directories before
/// descending into them.
///
/// Hidden files are included and ignore files are not read unless
/// `respect_gitignore` is set. Entries are sorted by file name within each
/// directory.
pub(crate) fn build_walker(root: &Path, rules: &Arc<IgnoreRules>, walk: &WalkConfig) -> ignore::Walk {
    let mut builder = WalkBuilder::new(root);

    builder
        .standard_filters(false)
        .follow_links(walk.follow_links)
        .sort_by_file_name(|a, b| a.cmp(b));

    if walk.respect_gitignore {
        builder
            .git_ignore(true)
            .git_exclude(true)
            .ignore(true)
            .require_git(false);
    }

    let rules = Arc::clone(rules);
    let root = root.to_path_buf();
    builder.filter_entry(move |entry| keep_entry(entry, &root, &rules));

    builder.build()
}

/// Pruning predicate: false means the entry (and its subtree) is never visited
fn keep_entry(entry: &DirEntry, root: &Path, rules: &IgnoreRules) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
        return true;
    }

    if rules.is_ignored_dir(&entry.file_name().to_string_lossy()) {
        tracing::debug!("Pruning ignored directory: {}", entry.path().display());
        return false;
    }

    if let Some(relative) = relative_path(entry.path(), root) {
        if rules.is_excluded(&relative) {
            tracing::debug!("Pruning excluded directory: {}", relative);
            return false;
        }
    }

    true
}

/// Path of `path` relative to `root`, always joined with `/`
pub fn relative_path(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IgnoreConfig;
    use std::fs;
    use tempfile::TempDir;

    fn collect_files(root: &Path, rules: IgnoreRules, walk: &WalkConfig) -> Vec<String> {
        build_walker(root, &Arc::new(rules), walk)
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .filter_map(|entry| relative_path(entry.path(), root))
            .collect()
    }

    #[test]
    fn test_relative_path_uses_forward_slashes() {
        let root = Path::new("/project");
        let path = root.join("src").join("cli").join("mod.rs");
        assert_eq!(relative_path(&path, root).as_deref(), Some("src/cli/mod.rs"));
        assert_eq!(relative_path(Path::new("/elsewhere/a.rs"), root), None);
    }

    #[test]
    fn test_ignored_directories_are_pruned_at_any_depth() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("src/lib.rs"), "lib").unwrap();
        fs::write(root.join("src/node_modules/pkg/index.js"), "js").unwrap();
        fs::write(root.join(".git/config"), "cfg").unwrap();
        fs::write(root.join(".hidden"), "hidden").unwrap();

        let rules = IgnoreRules::new(&IgnoreConfig::default()).unwrap();
        let files = collect_files(root, rules, &WalkConfig::default());

        assert_eq!(files, vec![".hidden".to_string(), "src/lib.rs".to_string()]);
    }

    #[test]
    fn test_root_named_like_ignored_directory_is_walked() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("build");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();

        let rules = IgnoreRules::new(&IgnoreConfig::default()).unwrap();
        let files = collect_files(&root, rules, &WalkConfig::default());

        assert_eq!(files, vec!["a.txt".to_string()]);
    }

    #[test]
    fn test_excluded_directories_are_pruned() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("docs/api")).unwrap();
        fs::write(root.join("docs/api/index.md"), "docs").unwrap();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();

        let config = IgnoreConfig {
            patterns: vec!["docs".to_string()],
            ..IgnoreConfig::default()
        };
        let files = collect_files(root, IgnoreRules::new(&config).unwrap(), &WalkConfig::default());

        assert_eq!(files, vec!["main.rs".to_string()]);
    }

    #[test]
    fn test_gitignore_only_when_enabled() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(".gitignore"), "secret.txt\n").unwrap();
        fs::write(root.join("secret.txt"), "s").unwrap();
        fs::write(root.join("visible.txt"), "v").unwrap();

        let plain = collect_files(root, IgnoreRules::empty(), &WalkConfig::default());
        assert!(plain.contains(&"secret.txt".to_string()));

        let walk = WalkConfig {
            respect_gitignore: true,
            ..WalkConfig::default()
        };
        let filtered = collect_files(root, IgnoreRules::empty(), &walk);
        assert!(!filtered.contains(&"secret.txt".to_string()));
        assert!(filtered.contains(&"visible.txt".to_string()));
    }
}
