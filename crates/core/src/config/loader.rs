//! Configuration file loader for `.releaserc` files.
//!
//! The loader looks for the first of [`CONFIG_FILE_NAMES`] in the project
//! root, parses it according to its extension and validates the result:
//! - `.releaserc`, `.releaserc.yaml`, `.releaserc.yml`: YAML (JSON is valid YAML)
//! - `.releaserc.json`: JSON
//! - `.releaserc.toml`: TOML

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::{ConfigFormat, LoadedConfig, CONFIG_FILE_NAMES};
use crate::config::validation::validate;
use rk_protocol::config_models::ReleaseConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Returns the first configuration file present in `root`, if any.
pub fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

/// Loads and validates the release configuration found in `root`.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - No configuration file exists in `root`
/// - The file cannot be read or has invalid syntax
/// - The configuration references unknown plugins or is otherwise invalid
///
/// # Example
///
/// ```rust,no_run
/// use rk_core::config::loader::load_config;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("."))?;
/// println!("Loaded {} publish targets", config.release.publish.len());
/// # Ok(())
/// # }
/// ```
pub fn load_config(root: &Path) -> ConfigResult<LoadedConfig> {
    let path = find_config_file(root).ok_or_else(|| ConfigError::NotFound {
        root: root.to_path_buf(),
        candidates: CONFIG_FILE_NAMES.join(", "),
    })?;

    load_config_file(&path)
}

/// Loads and validates a specific configuration file.
pub fn load_config_file(path: &Path) -> ConfigResult<LoadedConfig> {
    debug!(path = %path.display(), "loading release configuration");

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let release = parse_config(&content, ConfigFormat::from_path(path), path)?;

    Ok(LoadedConfig {
        path: path.to_path_buf(),
        release,
    })
}

/// Parses configuration text and validates it.
///
/// `path` is only used for error messages.
pub fn parse_config(content: &str, format: ConfigFormat, path: &Path) -> ConfigResult<ReleaseConfig> {
    let config: ReleaseConfig = match format {
        ConfigFormat::Yaml => {
            // An empty file means "all defaults".
            if content.trim().is_empty() {
                ReleaseConfig::default()
            } else {
                serde_yaml::from_str(content).map_err(|source| ConfigError::YamlParse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|source| ConfigError::JsonParse {
                path: path.to_path_buf(),
                source,
            })?
        }
        ConfigFormat::Toml => toml::from_str(content).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })?,
    };

    validate(&config, path)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rk_protocol::config_models::{BranchRule, PublishTarget};
    use std::fs;
    use tempfile::tempdir;

    const RELEASERC: &str = r#"branches:
  - name: main
plugins:
  - "@semantic-release/commit-analyzer"
  - "@semantic-release/release-notes-generator"
  - - "@semantic-release/changelog"
    - changelogFile: CHANGELOG.md
  - - "@semantic-release/git"
    - assets:
        - CHANGELOG.md
  - semantic-release-docker-buildx
  - - "@semantic-release/github"
    - addReleases: bottom
publish:
  - path: semantic-release-docker-buildx
    buildArgs:
      COMMIT_TAG: $GIT_SHA
    imageNames:
      - betterdev/k8s-ci-cd
    platforms:
      - linux/amd64
      - linux/arm64
      - linux/arm/v7
  - "@semantic-release/github"
"#;

    /// Loading the full configuration keeps plugin order and publish targets.
    #[test]
    fn test_load_config_acceptance() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join(".releaserc"), RELEASERC).expect("Failed to write config");

        let config = load_config(dir.path()).expect("Failed to load config");

        assert!(config.path.ends_with(".releaserc"));
        assert_eq!(config.release.branches, vec![BranchRule::new("main")]);
        assert_eq!(config.release.plugins.len(), 6);
        assert_eq!(config.release.plugins[2].name(), "@semantic-release/changelog");
        assert_eq!(config.release.publish.len(), 2);
        assert!(matches!(config.release.publish[0], PublishTarget::Image(_)));
    }

    /// A missing configuration is an error, not an empty release.
    #[test]
    fn test_load_config_missing_file() {
        let dir = tempdir().expect("Failed to create temp dir");

        let result = load_config(dir.path());

        match result {
            Err(ConfigError::NotFound { root, candidates }) => {
                assert_eq!(root, dir.path());
                assert!(candidates.contains(".releaserc.json"));
            }
            other => panic!("Expected NotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_find_config_file_prefers_first_candidate() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join(".releaserc.json"), "{}").expect("write json");
        fs::write(dir.path().join(".releaserc.yaml"), "").expect("write yaml");

        let found = find_config_file(dir.path()).expect("Should find a config");
        assert!(found.ends_with(".releaserc.yaml"));
    }

    /// An empty YAML file yields the default configuration.
    #[test]
    fn test_load_config_empty_file_uses_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join(".releaserc.yml"), "\n").expect("Failed to write config");

        let config = load_config(dir.path()).expect("Empty config should load");

        assert_eq!(config.release, ReleaseConfig::default());
    }

    #[test]
    fn test_load_config_json() {
        let dir = tempdir().expect("Failed to create temp dir");
        let json = r#"{
            "branches": ["main"],
            "plugins": ["@semantic-release/commit-analyzer", "@semantic-release/github"],
            "publish": ["@semantic-release/github"]
        }"#;
        fs::write(dir.path().join(".releaserc.json"), json).expect("Failed to write config");

        let config = load_config(dir.path()).expect("JSON config should load");

        assert_eq!(config.release.publish.len(), 1);
    }

    #[test]
    fn test_load_config_toml() {
        let dir = tempdir().expect("Failed to create temp dir");
        let toml_str = r#"
branches = ["main", "release/*"]
plugins = ["@semantic-release/commit-analyzer", "@semantic-release/release-notes-generator"]
tagFormat = "release-${version}"
"#;
        fs::write(dir.path().join(".releaserc.toml"), toml_str).expect("Failed to write config");

        let config = load_config(dir.path()).expect("TOML config should load");

        assert_eq!(config.release.tag_format, "release-${version}");
        assert_eq!(config.release.branches.len(), 2);
    }

    /// REFACTOR: Test invalid YAML syntax.
    #[test]
    fn test_load_config_invalid_yaml() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join(".releaserc"), "branches: [main\n  plugins: x")
            .expect("Failed to write config");

        let result = load_config(dir.path());

        if let Err(ConfigError::YamlParse { path, .. }) = result {
            assert!(path.ends_with(".releaserc"));
        } else {
            panic!("Expected YamlParse error");
        }
    }

    /// REFACTOR: Test invalid JSON syntax.
    #[test]
    fn test_load_config_invalid_json() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join(".releaserc.json"), "{ \"branches\": ")
            .expect("Failed to write config");

        let result = load_config(dir.path());
        assert!(matches!(result, Err(ConfigError::JsonParse { .. })));
    }

    /// REFACTOR: Test invalid TOML syntax.
    #[test]
    fn test_load_config_invalid_toml() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join(".releaserc.toml"), "branches = [invalid toml")
            .expect("Failed to write config");

        let result = load_config(dir.path());
        assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
    }

    /// REFACTOR: Test that parsing runs validation.
    #[test]
    fn test_load_config_unknown_plugin() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(
            dir.path().join(".releaserc"),
            "plugins:\n  - \"@semantic-release/npm\"\n",
        )
        .expect("Failed to write config");

        let result = load_config(dir.path());

        match result {
            Err(ConfigError::UnknownPlugin { name, .. }) => {
                assert_eq!(name, "@semantic-release/npm");
            }
            other => panic!("Expected UnknownPlugin error, got {other:?}"),
        }
    }
}
