//! # rk-core
//!
//! Release pipeline engine for release-kit.
//!
//! This crate provides:
//! - Loading and validating `.releaserc` configuration
//! - The plugin abstraction and its adapters (commit analysis, notes,
//!   changelog, git, Docker, GitHub)
//! - The sequential pipeline engine
//! - The concurrent publish dispatcher
//! - Release-run state management
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and validation
//! - [`plugins`]: Plugin trait, adapters, registry and command runner
//! - [`engine`]: Pipeline execution engine and release context
//! - [`publish`]: Publish targets and dispatcher
//! - [`state`]: Release-run state and the release manager
//! - [`git`]: Git repository access through the `git` CLI
//! - [`init`]: Starter configuration templates

pub mod config;
pub mod engine;
pub mod git;
pub mod init;
pub mod plugins;
pub mod publish;
pub mod state;
