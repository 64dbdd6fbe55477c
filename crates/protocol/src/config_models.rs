//! Release configuration models for `.releaserc` files.
//!
//! This module defines the structure of the declarative release
//! configuration: the branches eligible for release, the ordered plugin
//! pipeline and the publish targets.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Free-form options attached to a plugin step.
///
/// Each plugin interprets its own keys; the loader converts the map into
/// the plugin's typed options during validation.
pub type PluginOptions = serde_json::Map<String, serde_json::Value>;

/// Placeholder that `tag_format` must contain exactly once.
pub const VERSION_PLACEHOLDER: &str = "${version}";

/// Represents a complete release configuration.
///
/// # Example
///
/// ```yaml
/// branches:
///   - name: main
/// plugins:
///   - "@semantic-release/commit-analyzer"
///   - "@semantic-release/release-notes-generator"
///   - - "@semantic-release/changelog"
///     - changelogFile: CHANGELOG.md
/// publish:
///   - path: semantic-release-docker-buildx
///     buildArgs:
///       COMMIT_TAG: $GIT_SHA
///     imageNames: [betterdev/k8s-ci-cd]
///     platforms: [linux/amd64, linux/arm64]
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReleaseConfig {
    /// Branches that are allowed to produce releases. Order is not significant.
    #[serde(default = "default_branches")]
    pub branches: Vec<BranchRule>,

    /// Ordered plugin steps. Order is the execution order.
    #[serde(default = "default_plugins")]
    pub plugins: Vec<PluginStep>,

    /// Publish targets invoked after the pipeline succeeds.
    #[serde(default)]
    pub publish: Vec<PublishTarget>,

    /// Git tag template; must contain `${version}` exactly once.
    #[serde(default = "default_tag_format")]
    pub tag_format: String,

    /// Run every step without mutating the repository and skip publishing.
    #[serde(default)]
    pub dry_run: bool,

    /// Maximum number of publish targets running at the same time.
    #[serde(default = "default_publish_concurrency")]
    pub publish_concurrency: usize,

    /// Skip publish targets that have not started once one of them failed.
    #[serde(default)]
    pub publish_fail_fast: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            branches: default_branches(),
            plugins: default_plugins(),
            publish: Vec::new(),
            tag_format: default_tag_format(),
            dry_run: false,
            publish_concurrency: default_publish_concurrency(),
            publish_fail_fast: false,
        }
    }
}

impl ReleaseConfig {
    /// Names of all plugin steps, in execution order.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(PluginStep::name).collect()
    }
}

fn default_branches() -> Vec<BranchRule> {
    vec![BranchRule::new("main"), BranchRule::new("master")]
}

fn default_plugins() -> Vec<PluginStep> {
    vec![
        PluginStep::Bare("@semantic-release/commit-analyzer".to_string()),
        PluginStep::Bare("@semantic-release/release-notes-generator".to_string()),
    ]
}

fn default_tag_format() -> String {
    format!("v{VERSION_PLACEHOLDER}")
}

fn default_publish_concurrency() -> usize {
    4
}

/// A branch eligible for release.
///
/// Accepts both `main` and `{ name: main }` forms. The name is a glob
/// pattern, so `release/*` matches `release/1.x`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BranchRule {
    pub name: String,
}

impl BranchRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl<'de> Deserialize<'de> for BranchRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Named {
            name: String,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bare(String),
            Named(Named),
        }

        match Raw::deserialize(deserializer) {
            Ok(Raw::Bare(name)) => Ok(BranchRule { name }),
            Ok(Raw::Named(named)) => Ok(BranchRule { name: named.name }),
            Err(_) => Err(serde::de::Error::custom(
                "branch rule must be a string or an object with a `name` field",
            )),
        }
    }
}

/// A single step in the plugin pipeline.
///
/// A step is either a bare plugin name or a `[name, options]` pair:
///
/// ```yaml
/// plugins:
///   - "@semantic-release/commit-analyzer"
///   - ["@semantic-release/changelog", { changelogFile: CHANGELOG.md }]
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PluginStep {
    /// Plugin referenced by name, with default options.
    Bare(String),

    /// Plugin referenced by name with an options map.
    Configured(String, PluginOptions),
}

impl PluginStep {
    /// The plugin name as written in the configuration.
    pub fn name(&self) -> &str {
        match self {
            Self::Bare(name) | Self::Configured(name, _) => name,
        }
    }

    /// The options map, if the step was configured with one.
    pub fn options(&self) -> Option<&PluginOptions> {
        match self {
            Self::Bare(_) => None,
            Self::Configured(_, options) => Some(options),
        }
    }
}

/// A publish destination invoked after the pipeline succeeds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PublishTarget {
    /// Bare reference to a plugin declared in `plugins`.
    Reference(String),

    /// Container image build-and-push target.
    Image(ImageTarget),
}

impl PublishTarget {
    /// Name of the plugin that handles this target.
    pub fn path(&self) -> &str {
        match self {
            Self::Reference(path) => path,
            Self::Image(image) => &image.path,
        }
    }
}

/// Structured container image target.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImageTarget {
    /// Plugin handling the target, e.g. `semantic-release-docker-buildx`.
    pub path: String,

    /// Build arguments. Values may reference environment variables
    /// (`$GIT_SHA`, `${GIT_SHA}`).
    #[serde(default)]
    pub build_args: BTreeMap<String, String>,

    /// Image repositories to push to.
    pub image_names: BTreeSet<String>,

    /// Platforms to build, in order. One build runs per platform.
    pub platforms: Vec<String>,

    /// Build context directory, relative to the working directory.
    #[serde(default = "default_build_context")]
    pub context: String,

    /// Dockerfile path, when not `<context>/Dockerfile`.
    #[serde(default)]
    pub dockerfile: Option<String>,
}

fn default_build_context() -> String {
    ".".to_string()
}
