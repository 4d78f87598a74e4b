use figment::Figment;
use figment::providers::{Format, Json, Toml, Yaml};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

/// Merge an explicit config file into `figment`, choosing the parser from
/// the extension and sniffing the content when the extension is unknown.
/// Undetectable content is parsed as TOML.
pub fn merge_file(figment: Figment, path: &Path) -> Figment {
    let format = format_for(path);
    tracing::debug!("Merging {} as {:?}", path.display(), format);

    match format {
        ConfigFormat::Toml => figment.merge(Toml::file(path)),
        ConfigFormat::Json => figment.merge(Json::file(path)),
        ConfigFormat::Yaml => figment.merge(Yaml::file(path)),
    }
}

fn format_for(path: &Path) -> ConfigFormat {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "toml" => ConfigFormat::Toml,
        "json" => ConfigFormat::Json,
        "yaml" | "yml" => ConfigFormat::Yaml,
        _ => std::fs::read_to_string(path)
            .ok()
            .and_then(|content| detect_format_from_content(&content))
            .unwrap_or(ConfigFormat::Toml),
    }
}

fn detect_format_from_content(content: &str) -> Option<ConfigFormat> {
    let trimmed = content.trim();

    if (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']') && !trimmed.contains('\n'))
    {
        return Some(ConfigFormat::Json);
    }

    // [section] headers or key = value
    if trimmed.lines().any(|line| {
        let line = line.trim();
        (line.starts_with('[') && line.ends_with(']')) || (line.contains('=') && !line.contains(':'))
    }) {
        return Some(ConfigFormat::Toml);
    }

    if trimmed.starts_with("---") || trimmed.lines().any(|line| line.trim().contains(": ")) {
        return Some(ConfigFormat::Yaml);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(format_for(Path::new("conf/dircombine.TOML")), ConfigFormat::Toml);
        assert_eq!(format_for(Path::new("settings.json")), ConfigFormat::Json);
        assert_eq!(format_for(Path::new("settings.yml")), ConfigFormat::Yaml);
        assert_eq!(format_for(Path::new("no/such/file.conf")), ConfigFormat::Toml);
    }

    #[test]
    fn test_extensionless_file_is_sniffed() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("dircombinerc");
        std::fs::write(&path, "output: from-yaml.txt\ndecode: drop\n").unwrap();

        let figment = merge_file(Figment::new(), &path);
        let output: String = figment.extract_inner("output").unwrap();
        assert_eq!(output, "from-yaml.txt");
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(detect_format_from_content(r#"{"output": "x.txt"}"#), Some(ConfigFormat::Json));
        assert_eq!(detect_format_from_content("output: x.txt"), Some(ConfigFormat::Yaml));
        assert_eq!(
            detect_format_from_content("[ignore]\nfiles = [\"a\"]"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(detect_format_from_content("output = \"x.txt\""), Some(ConfigFormat::Toml));
        assert_eq!(detect_format_from_content("just words"), None);
    }
}
