//! Semantic checks applied after a configuration has been parsed.

use crate::config::error::{ConfigError, ConfigResult};
use crate::plugins::options::PluginSettings;
use crate::plugins::plugin_type::PluginKind;
use rk_protocol::config_models::{PublishTarget, ReleaseConfig, VERSION_PLACEHOLDER};
use std::collections::HashSet;
use std::path::Path;

/// Validates a parsed configuration.
///
/// Checks run in a fixed order (branches, plugins, publish targets, global
/// settings) so the first reported error is stable.
pub fn validate(config: &ReleaseConfig, path: &Path) -> ConfigResult<()> {
    validate_branches(config, path)?;
    let declared = validate_plugins(config, path)?;
    validate_publish(config, &declared, path)?;
    validate_settings(config, path)
}

fn invalid(path: &Path, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidConfig {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn validate_branches(config: &ReleaseConfig, path: &Path) -> ConfigResult<()> {
    if config.branches.is_empty() {
        return Err(invalid(path, "`branches` must list at least one branch"));
    }

    let mut seen = HashSet::new();
    for rule in &config.branches {
        if !seen.insert(rule.name.as_str()) {
            return Err(ConfigError::DuplicateBranch {
                path: path.to_path_buf(),
                name: rule.name.clone(),
            });
        }
        glob::Pattern::new(&rule.name).map_err(|e| ConfigError::InvalidBranchPattern {
            path: path.to_path_buf(),
            name: rule.name.clone(),
            reason: e.to_string(),
        })?;
    }

    Ok(())
}

/// Returns the declared plugin names together with their kinds.
fn validate_plugins<'a>(
    config: &'a ReleaseConfig,
    path: &Path,
) -> ConfigResult<Vec<(&'a str, PluginKind)>> {
    let mut declared: Vec<(&str, PluginKind)> = Vec::with_capacity(config.plugins.len());

    for step in &config.plugins {
        let name = step.name();
        let kind = PluginKind::from_name(name).ok_or_else(|| ConfigError::UnknownPlugin {
            path: path.to_path_buf(),
            name: name.to_string(),
        })?;

        if declared.iter().any(|(_, k)| *k == kind) {
            return Err(ConfigError::DuplicatePlugin {
                path: path.to_path_buf(),
                name: name.to_string(),
            });
        }

        PluginSettings::parse(kind, step.options()).map_err(|e| {
            ConfigError::InvalidPluginOptions {
                path: path.to_path_buf(),
                plugin: name.to_string(),
                reason: e.to_string(),
            }
        })?;

        declared.push((name, kind));
    }

    Ok(declared)
}

fn validate_publish(
    config: &ReleaseConfig,
    declared: &[(&str, PluginKind)],
    path: &Path,
) -> ConfigResult<()> {
    let mut references = HashSet::new();

    for target in &config.publish {
        let target_path = target.path();
        let kind = PluginKind::from_name(target_path)
            .filter(|kind| declared.iter().any(|(_, k)| k == kind))
            .ok_or_else(|| ConfigError::UnknownPublishTarget {
                path: path.to_path_buf(),
                name: target_path.to_string(),
            })?;

        if !kind.can_publish() {
            return Err(invalid(
                path,
                format!("plugin `{target_path}` cannot be used as a publish target"),
            ));
        }

        match (target, kind) {
            (PublishTarget::Reference(_), PluginKind::GitHub) => {
                if !references.insert(kind) {
                    return Err(invalid(
                        path,
                        format!("publish target `{target_path}` is listed more than once"),
                    ));
                }
            }
            (PublishTarget::Image(image), PluginKind::DockerBuildx) => {
                if image.image_names.is_empty() {
                    return Err(invalid(
                        path,
                        format!("publish target `{target_path}` has no `imageNames`"),
                    ));
                }
                if image.image_names.iter().any(|name| name.trim().is_empty()) {
                    return Err(invalid(
                        path,
                        format!("publish target `{target_path}` has an empty image name"),
                    ));
                }
                if image.platforms.is_empty() {
                    return Err(invalid(
                        path,
                        format!("publish target `{target_path}` has no `platforms`"),
                    ));
                }
                let mut platforms = HashSet::new();
                for platform in &image.platforms {
                    if platform.trim().is_empty() {
                        return Err(invalid(
                            path,
                            format!("publish target `{target_path}` has an empty platform"),
                        ));
                    }
                    if !platforms.insert(platform.as_str()) {
                        return Err(invalid(
                            path,
                            format!(
                                "publish target `{target_path}` lists platform `{platform}` more than once"
                            ),
                        ));
                    }
                }
            }
            (PublishTarget::Reference(_), PluginKind::DockerBuildx) => {
                return Err(invalid(
                    path,
                    format!(
                        "publish target `{target_path}` needs `imageNames` and `platforms`"
                    ),
                ));
            }
            (PublishTarget::Image(_), _) => {
                return Err(invalid(
                    path,
                    format!("publish target `{target_path}` does not accept image settings"),
                ));
            }
            (PublishTarget::Reference(_), _) => {
                return Err(invalid(
                    path,
                    format!("plugin `{target_path}` cannot be used as a publish target"),
                ));
            }
        }
    }

    Ok(())
}

fn validate_settings(config: &ReleaseConfig, path: &Path) -> ConfigResult<()> {
    if config.tag_format.matches(VERSION_PLACEHOLDER).count() != 1 {
        return Err(invalid(
            path,
            format!(
                "`tagFormat` must contain {VERSION_PLACEHOLDER} exactly once, got `{}`",
                config.tag_format
            ),
        ));
    }

    if config.tag_format.chars().any(char::is_whitespace) {
        return Err(invalid(path, "`tagFormat` must not contain whitespace"));
    }

    if config.publish_concurrency == 0 {
        return Err(invalid(path, "`publishConcurrency` must be at least 1"));
    }

    Ok(())
}
