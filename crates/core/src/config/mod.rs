//! Configuration loading and validation.
//!
//! This module locates the `.releaserc` file, parses it into a
//! [`ReleaseConfig`](rk_protocol::config_models::ReleaseConfig) and rejects
//! configurations that cannot run.

pub mod branches;
pub mod error;
pub mod loader;
pub mod models;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{find_config_file, load_config, load_config_file, parse_config};
pub use models::{ConfigFormat, LoadedConfig};
