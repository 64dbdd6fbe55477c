//! `release init`: write a starter release configuration.
//!
//! # Example
//!
//! ```no_run
//! use rk_core::init::{generate_release_config, InitOptions};
//!
//! let path = generate_release_config(&InitOptions::default())?;
//! println!("Release configuration written to {}", path.display());
//! # Ok::<(), rk_core::init::InitError>(())
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_release_config, InitOptions, GENERATED_FILE_NAME};
pub use templates::{get_template, list_templates};
