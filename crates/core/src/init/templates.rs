//! Embedded release configuration templates.
//!
//! Templates live in the crate's `templates/` directory and are embedded at
//! compile time with `rust-embed`, so `release init` needs no files on disk.

use rust_embed::RustEmbed;

/// Full example: changelog, git commit, multi-platform images, GitHub release.
pub const FULL_TEMPLATE: &str = "releaserc.yaml";

/// Commit analysis, notes and a GitHub release only.
pub const MINIMAL_TEMPLATE: &str = "releaserc-minimal.yaml";

/// Embedded template files from the crate's `templates/` directory.
///
/// With the `debug-embed` feature, debug builds embed the files as well
/// instead of reading them from disk.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/templates"]
pub struct TemplateAssets;

/// Get template file content by name.
///
/// # Example
/// ```
/// use rk_core::init::templates::get_template;
///
/// let template = get_template("releaserc.yaml").expect("template should exist");
/// assert!(template.contains("semantic-release-docker-buildx"));
/// ```
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

/// Names of all embedded templates.
pub fn list_templates() -> Vec<String> {
    TemplateAssets::iter().map(|path| path.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config, ConfigFormat};
    use std::path::Path;

    #[test]
    fn test_full_template_is_valid() {
        let content = get_template(FULL_TEMPLATE).unwrap();
        let config = parse_config(&content, ConfigFormat::Yaml, Path::new(FULL_TEMPLATE)).unwrap();

        assert_eq!(config.plugins.len(), 6);
        assert_eq!(config.publish.len(), 2);
        assert_eq!(config.publish_concurrency, 4);
    }

    #[test]
    fn test_minimal_template_is_valid() {
        let content = get_template(MINIMAL_TEMPLATE).unwrap();
        let config =
            parse_config(&content, ConfigFormat::Yaml, Path::new(MINIMAL_TEMPLATE)).unwrap();

        assert_eq!(
            config.plugin_names(),
            vec![
                "@semantic-release/commit-analyzer",
                "@semantic-release/release-notes-generator",
                "@semantic-release/github",
            ]
        );
    }

    #[test]
    fn test_get_nonexistent_template() {
        assert!(get_template("nonexistent.txt").is_none());
    }

    #[test]
    fn test_list_templates() {
        let all = list_templates();
        assert!(all.contains(&FULL_TEMPLATE.to_string()));
        assert!(all.contains(&MINIMAL_TEMPLATE.to_string()));
    }
}
