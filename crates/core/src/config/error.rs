//! Error types for configuration loading.
//!
//! This module defines all errors that can occur while locating, parsing
//! and validating a release configuration. Every variant is fatal: the
//! release aborts before any pipeline step runs.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No configuration file was found in the project root.
    #[error("No release configuration found in {root} (looked for {candidates})")]
    NotFound { root: PathBuf, candidates: String },

    /// Failed to read a configuration file from disk.
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse YAML file at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Failed to parse JSON configuration.
    #[error("Failed to parse JSON file at {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML file at {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A plugin step references a plugin that does not exist.
    #[error("Unknown plugin `{name}` in {path}")]
    UnknownPlugin { path: PathBuf, name: String },

    /// The same plugin appears twice in the pipeline.
    #[error("Plugin `{name}` is listed more than once in {path}")]
    DuplicatePlugin { path: PathBuf, name: String },

    /// A plugin's options do not match what the plugin accepts.
    #[error("Invalid options for plugin `{plugin}` in {path}: {reason}")]
    InvalidPluginOptions {
        path: PathBuf,
        plugin: String,
        reason: String,
    },

    /// Two branch rules share the same name.
    #[error("Branch rule `{name}` is declared more than once in {path}")]
    DuplicateBranch { path: PathBuf, name: String },

    /// A branch rule is not a valid glob pattern.
    #[error("Branch rule `{name}` in {path} is not a valid pattern: {reason}")]
    InvalidBranchPattern {
        path: PathBuf,
        name: String,
        reason: String,
    },

    /// A publish target references a plugin that is not declared in `plugins`.
    #[error("Publish target `{name}` in {path} does not reference a plugin declared in `plugins`")]
    UnknownPublishTarget { path: PathBuf, name: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration in {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },
}

/// Type alias for Result with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;
