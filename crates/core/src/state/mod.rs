//! State management for release runs.
//!
//! This module provides:
//! - Release-run state machine logic
//! - ReleaseManager for running one release end to end

pub mod manager;
pub mod run;

pub use manager::{ReleaseManager, ReleaseReport};
