//! Writes a starter `.releaserc.yaml`.

use super::error::{InitError, InitResult};
use super::templates::{get_template, FULL_TEMPLATE, MINIMAL_TEMPLATE};
use crate::config::find_config_file;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// File name written by [`generate_release_config`].
pub const GENERATED_FILE_NAME: &str = ".releaserc.yaml";

/// Options for writing a release configuration.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory the configuration is written to.
    pub target_dir: PathBuf,

    /// Overwrite an existing configuration.
    pub force: bool,

    /// Write the minimal template (GitHub release only).
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Write `.releaserc.yaml` into `options.target_dir`.
///
/// Any existing configuration file (`.releaserc`, `.releaserc.json`, ...)
/// counts as existing, so a repository never ends up with two.
///
/// # Returns
/// The path of the written file, or an `InitError` if:
/// - A configuration already exists (without force flag)
/// - The template cannot be found
/// - File system operations fail
///
/// # Example
/// ```no_run
/// use rk_core::init::{generate_release_config, InitOptions};
/// use std::path::PathBuf;
///
/// let options = InitOptions {
///     target_dir: PathBuf::from("."),
///     force: false,
///     minimal: true,
/// };
/// let path = generate_release_config(&options)?;
/// println!("wrote {}", path.display());
/// # Ok::<(), rk_core::init::InitError>(())
/// ```
pub fn generate_release_config(options: &InitOptions) -> InitResult<PathBuf> {
    if let Some(existing) = find_config_file(&options.target_dir) {
        if !options.force {
            return Err(InitError::ConfigExists(existing));
        }
    }

    let template = if options.minimal {
        MINIMAL_TEMPLATE
    } else {
        FULL_TEMPLATE
    };
    let content =
        get_template(template).ok_or_else(|| InitError::TemplateNotFound(template.to_string()))?;

    fs::create_dir_all(&options.target_dir).map_err(|source| InitError::DirectoryCreate {
        path: options.target_dir.clone(),
        source,
    })?;

    let target_path = options.target_dir.join(GENERATED_FILE_NAME);
    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path.clone(),
        source,
    })?;

    info!(path = %target_path.display(), template, "wrote release configuration");
    Ok(target_path)
}
