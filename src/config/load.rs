use super::{CombineConfig, smart_load};
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, `__` separates nested keys
const ENV_PREFIX: &str = "DIRCOMBINE_";

impl CombineConfig {
    /// Load configuration using the standard search locations
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    /// Load configuration, optionally from an explicit file.
    ///
    /// With a custom file only defaults, that file and the environment are
    /// merged; user and repository config files are not consulted.
    pub fn load_with_custom_config(custom_config: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(CombineConfig::default()));

        if let Some(custom_path) = custom_config {
            if !custom_path.is_file() {
                anyhow::bail!("Config file not found: {}", custom_path.display());
            }
            tracing::debug!("Loading custom config from {}", custom_path.display());
            figment = smart_load::merge_file(figment, custom_path);
        } else {
            let user_dir = Self::user_config_dir();
            figment = figment
                // User config - support multiple formats
                .merge(Toml::file(user_dir.join("config.toml")))
                .merge(Json::file(user_dir.join("config.json")))
                .merge(Yaml::file(user_dir.join("config.yaml")))
                .merge(Yaml::file(user_dir.join("config.yml")))
                // Repository config
                .merge(Toml::file("dircombine.toml"))
                .merge(Json::file("dircombine.json"))
                .merge(Yaml::file("dircombine.yaml"))
                .merge(Yaml::file("dircombine.yml"));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: CombineConfig = figment
            .extract()
            .context("Failed to parse configuration")?;

        tracing::debug!(
            "Configuration loaded: {} ignored dirs, {} ignored files, {} ignored extensions, {} patterns",
            config.ignore.directories.len(),
            config.ignore.files.len(),
            config.ignore.extensions.len(),
            config.ignore.patterns.len()
        );

        Ok(config)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize configuration")
    }

    fn user_config_dir() -> PathBuf {
        match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home).join(".config").join("dircombine"),
            Err(_) => PathBuf::from("~/.config/dircombine"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecodePolicy;
    use figment::Jail;

    fn load_in_jail(custom: Option<&Path>) -> Result<CombineConfig, figment::Error> {
        CombineConfig::load_with_custom_config(custom).map_err(|e| format!("{e:#}").into())
    }

    #[test]
    fn test_defaults_without_files() {
        Jail::expect_with(|jail| {
            let home = jail.directory().display().to_string();
            jail.set_env("HOME", home);
            let config = load_in_jail(None)?;
            assert_eq!(config, CombineConfig::default());
            assert_eq!(config.output, "combined_code.txt");
            Ok(())
        });
    }

    #[test]
    fn test_repository_config_replaces_lists() {
        Jail::expect_with(|jail| {
            let home = jail.directory().display().to_string();
            jail.set_env("HOME", home);
            jail.create_file(
                "dircombine.toml",
                r#"
                output = "bundle.txt"

                [ignore]
                directories = ["vendor"]
                "#,
            )?;
            let config = load_in_jail(None)?;
            assert_eq!(config.output, "bundle.txt");
            assert_eq!(config.ignore.directories, vec!["vendor".to_string()]);
            // Untouched lists keep their defaults
            assert!(config.ignore.extensions.contains(&"png".to_string()));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_nested_keys() {
        Jail::expect_with(|jail| {
            let home = jail.directory().display().to_string();
            jail.set_env("HOME", home);
            jail.create_file("dircombine.yaml", "decode: replace\n")?;
            jail.set_env("DIRCOMBINE_DECODE", "drop");
            jail.set_env("DIRCOMBINE_WALK__FOLLOW_LINKS", "true");
            let config = load_in_jail(None)?;
            assert_eq!(config.decode, DecodePolicy::Drop);
            assert!(config.walk.follow_links);
            assert!(!config.walk.respect_gitignore);
            Ok(())
        });
    }

    #[test]
    fn test_custom_config_skips_repository_config() {
        Jail::expect_with(|jail| {
            let home = jail.directory().display().to_string();
            jail.set_env("HOME", home);
            jail.create_file("dircombine.toml", "output = \"repo.txt\"\n")?;
            jail.create_file("custom.json", r#"{ "ignore": { "patterns": ["**/*.snap"] } }"#)?;
            let custom = jail.directory().join("custom.json");
            let config = load_in_jail(Some(&custom))?;
            assert_eq!(config.output, "combined_code.txt");
            assert_eq!(config.ignore.patterns, vec!["**/*.snap".to_string()]);
            Ok(())
        });
    }

    #[test]
    fn test_missing_custom_config_is_an_error() {
        let result = CombineConfig::load_with_custom_config(Some(Path::new(
            "definitely/not/here/dircombine.toml",
        )));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_to_toml_round_trips_through_figment() {
        let config = CombineConfig::default();
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("decode = \"replace\""));
        let parsed: CombineConfig = Figment::from(Toml::string(&rendered)).extract().unwrap();
        assert_eq!(parsed, config);
    }
}
