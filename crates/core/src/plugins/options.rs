//! Typed options for each plugin.
//!
//! The configuration keeps plugin options as an open JSON map. They are
//! converted here, once at load time for validation and again when the
//! factory builds the plugin.

use crate::plugins::plugin_type::PluginKind;
use rk_protocol::config_models::PluginOptions;
use rk_protocol::release_models::ReleaseType;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// A custom commit classification rule for the commit analyzer.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReleaseRule {
    /// Conventional commit type, e.g. `docs`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Only match commits with this scope.
    #[serde(default)]
    pub scope: Option<String>,

    pub release: ReleaseType,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CommitAnalyzerOptions {
    #[serde(default)]
    pub release_rules: Vec<ReleaseRule>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReleaseNotesOptions {}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChangelogOptions {
    #[serde(default = "default_changelog_file")]
    pub changelog_file: String,

    /// Heading kept at the top of the file, above all releases.
    #[serde(default)]
    pub changelog_title: Option<String>,
}

impl Default for ChangelogOptions {
    fn default() -> Self {
        Self {
            changelog_file: default_changelog_file(),
            changelog_title: None,
        }
    }
}

fn default_changelog_file() -> String {
    "CHANGELOG.md".to_string()
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GitOptions {
    /// Files to commit, relative to the working directory.
    #[serde(default = "default_git_assets")]
    pub assets: Vec<String>,

    /// Commit message template.
    #[serde(default = "default_git_message")]
    pub message: String,
}

impl Default for GitOptions {
    fn default() -> Self {
        Self {
            assets: default_git_assets(),
            message: default_git_message(),
        }
    }
}

fn default_git_assets() -> Vec<String> {
    vec!["CHANGELOG.md".to_string()]
}

fn default_git_message() -> String {
    "chore(release): ${nextRelease.version} [skip ci]\n\n${nextRelease.notes}".to_string()
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DockerBuildxOptions {}

/// Where the GitHub release lists the other releases of the same run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddReleases {
    #[default]
    Off,
    Top,
    Bottom,
}

impl<'de> Deserialize<'de> for AddReleases {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Position(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(false) => Ok(AddReleases::Off),
            Raw::Position(position) if position == "top" => Ok(AddReleases::Top),
            Raw::Position(position) if position == "bottom" => Ok(AddReleases::Bottom),
            _ => Err(serde::de::Error::custom(
                "addReleases must be false, \"top\" or \"bottom\"",
            )),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GitHubOptions {
    #[serde(default)]
    pub add_releases: AddReleases,

    #[serde(default)]
    pub draft: bool,

    /// `owner/name`; defaults to the repository of the working directory.
    #[serde(default)]
    pub repository: Option<String>,
}

/// Options of one plugin step, typed by plugin kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginSettings {
    CommitAnalyzer(CommitAnalyzerOptions),
    ReleaseNotes(ReleaseNotesOptions),
    Changelog(ChangelogOptions),
    Git(GitOptions),
    DockerBuildx(DockerBuildxOptions),
    GitHub(GitHubOptions),
}

impl PluginSettings {
    /// Convert a step's raw options into the options of `kind`.
    ///
    /// A step without options gets the plugin defaults.
    pub fn parse(kind: PluginKind, options: Option<&PluginOptions>) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            PluginKind::CommitAnalyzer => Self::CommitAnalyzer(decode(options)?),
            PluginKind::ReleaseNotes => Self::ReleaseNotes(decode(options)?),
            PluginKind::Changelog => Self::Changelog(decode(options)?),
            PluginKind::Git => Self::Git(decode(options)?),
            PluginKind::DockerBuildx => Self::DockerBuildx(decode(options)?),
            PluginKind::GitHub => Self::GitHub(decode(options)?),
        })
    }
}

fn decode<T>(options: Option<&PluginOptions>) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned,
{
    let map = options.cloned().unwrap_or_default();
    serde_json::from_value(serde_json::Value::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: serde_json::Value) -> PluginOptions {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_defaults_without_options() {
        assert_eq!(
            PluginSettings::parse(PluginKind::Changelog, None).unwrap(),
            PluginSettings::Changelog(ChangelogOptions::default())
        );
        match PluginSettings::parse(PluginKind::Git, None).unwrap() {
            PluginSettings::Git(git) => {
                assert_eq!(git.assets, vec!["CHANGELOG.md"]);
                assert!(git.message.contains("${nextRelease.version}"));
            }
            other => panic!("Expected git settings, got {other:?}"),
        }
    }

    #[test]
    fn test_release_rules() {
        let raw = options(json!({
            "releaseRules": [
                {"type": "docs", "scope": "README", "release": "patch"},
                {"type": "refactor", "release": "minor"}
            ]
        }));

        let settings = PluginSettings::parse(PluginKind::CommitAnalyzer, Some(&raw)).unwrap();

        let PluginSettings::CommitAnalyzer(analyzer) = settings else {
            panic!("Expected commit analyzer settings");
        };
        assert_eq!(analyzer.release_rules.len(), 2);
        assert_eq!(analyzer.release_rules[0].scope.as_deref(), Some("README"));
        assert_eq!(analyzer.release_rules[1].release, ReleaseType::Minor);
    }

    #[test]
    fn test_add_releases_forms() {
        for (value, expected) in [
            (json!(false), AddReleases::Off),
            (json!("top"), AddReleases::Top),
            (json!("bottom"), AddReleases::Bottom),
        ] {
            let raw = options(json!({ "addReleases": value }));
            let settings = PluginSettings::parse(PluginKind::GitHub, Some(&raw)).unwrap();
            let PluginSettings::GitHub(github) = settings else {
                panic!("Expected github settings");
            };
            assert_eq!(github.add_releases, expected);
        }

        let raw = options(json!({ "addReleases": true }));
        let err = PluginSettings::parse(PluginKind::GitHub, Some(&raw)).unwrap_err();
        assert!(err.to_string().contains("addReleases must be"));
    }

    #[test]
    fn test_unknown_option_rejected() {
        let raw = options(json!({ "assetz": ["dist"] }));
        assert!(PluginSettings::parse(PluginKind::Git, Some(&raw)).is_err());

        let raw = options(json!({ "anything": 1 }));
        assert!(PluginSettings::parse(PluginKind::DockerBuildx, Some(&raw)).is_err());
    }
}
