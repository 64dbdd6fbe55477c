//! Common test utilities shared by the integration suites.
//!
//! This module provides:
//! - Fixtures (release configurations, scripted git output, contexts)
//! - Mock plugins and publishers
//! - Event assertions

pub mod assertions;
pub mod fixtures;
pub mod mock_plugins;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_plugins::*;
