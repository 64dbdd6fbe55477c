//! Loaded configuration and source formats.

use rk_protocol::config_models::ReleaseConfig;
use std::path::{Path, PathBuf};

/// File names searched, in order, when no explicit path is given.
pub const CONFIG_FILE_NAMES: [&str; 5] = [
    ".releaserc",
    ".releaserc.yaml",
    ".releaserc.yml",
    ".releaserc.json",
    ".releaserc.toml",
];

/// A validated release configuration and the file it came from.
///
/// # Example
///
/// ```rust,no_run
/// use rk_core::config::loader::load_config;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("."))?;
/// println!("Loaded {} plugins from {}",
///          config.release.plugins.len(),
///          config.path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Path of the configuration file.
    pub path: PathBuf,

    /// The parsed and validated configuration.
    pub release: ReleaseConfig,
}

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML, which also accepts JSON documents. Used for `.releaserc`.
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new(".releaserc")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new(".releaserc.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new(".releaserc.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a/b/.releaserc.toml")), ConfigFormat::Toml);
    }
}
