//! Plugin abstraction and management.
//!
//! This module provides the `Plugin` trait (Adapter Pattern), one adapter
//! per supported release plugin, and the `PluginRegistry` that the
//! pipeline executes them through.

pub mod adapters;
pub mod base;
pub mod cli_executor;
pub mod conventional;
pub mod factory;
pub mod options;
pub mod plugin_type;
pub mod registry;

pub use adapters::MockPlugin;
pub use base::{Plugin, PluginError, PluginEvent, PluginStream};
pub use cli_executor::{CliExecutor, CommandOutput, CommandRunner, Invocation, RecordingRunner};
pub use factory::PluginFactory;
pub use plugin_type::PluginKind;
pub use registry::PluginRegistry;
