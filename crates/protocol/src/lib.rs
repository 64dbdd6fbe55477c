//! # rk-protocol
//!
//! Shared data model for release-kit.
//!
//! This crate defines the data structures used for:
//! - Release configuration parsing (`.releaserc` in YAML, JSON or TOML)
//! - Release data passed between pipeline steps and publish targets
//! - Runtime state of a release run and the events it emits
//!
//! ## Modules
//!
//! - [`config_models`]: Branches, plugin steps and publish targets
//! - [`release_models`]: Commits, versions, artifacts and published releases
//! - [`run_models`]: Release-run state and status
//! - [`ipc`]: Progress events
//!
//! The crate depends only on serde, uuid and chrono so front-ends can
//! consume events without pulling in the engine.

pub mod config_models;
pub mod ipc;
pub mod release_models;
pub mod run_models;

pub use config_models::*;
pub use ipc::*;
pub use release_models::*;
pub use run_models::*;
