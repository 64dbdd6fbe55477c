//! Command-line interface for release-kit.
//!
//! The `release` binary loads the `.releaserc` configuration and drives the
//! core: `run` performs a release, `check` validates the configuration and
//! prints the plan, `init` writes a starter configuration.

use crate::output;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use colored::Colorize;
use rk_core::config::{load_config, load_config_file, LoadedConfig};
use rk_core::engine::context::ReleaseContext;
use rk_core::git::GitRepository;
use rk_core::init::{generate_release_config, InitOptions};
use rk_core::plugins::{CliExecutor, PluginRegistry};
use rk_core::state::ReleaseManager;
use rk_protocol::config_models::PublishTarget;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Release automation: analyze commits, run the release plugins in order,
/// then publish to every target.
#[derive(Parser, Debug)]
#[command(name = "release", version, about, long_about = None)]
pub struct Cli {
    /// Repository root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the release pipeline and publish
    Run {
        /// Run every step without changing the repository; publish nothing
        #[arg(long)]
        dry_run: bool,

        /// Branch to release (defaults to the checked-out branch)
        #[arg(long, env = "RELEASE_BRANCH")]
        branch: Option<String>,

        /// Configuration file (defaults to the first `.releaserc*` found)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Validate the configuration and print the release plan
    Check {
        /// Configuration file (defaults to the first `.releaserc*` found)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Print the parsed configuration as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a starter `.releaserc.yaml`
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,

        /// Only analyze commits and create a GitHub release
        #[arg(long)]
        minimal: bool,
    },
}

/// Install the stderr log subscriber.
pub fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub async fn run(cli: Cli) -> Result<()> {
    let root = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().wrap_err("Failed to read the current directory")?,
    };

    match cli.command {
        Commands::Run {
            dry_run,
            branch,
            config,
        } => release(&root, dry_run, branch, config.as_deref()).await,
        Commands::Check { config, json } => check(&root, config.as_deref(), json),
        Commands::Init { force, minimal } => {
            let path = generate_release_config(&InitOptions {
                target_dir: root,
                force,
                minimal,
            })?;
            println!("{} {}", "Created".green().bold(), path.display());
            Ok(())
        }
    }
}

fn load(root: &Path, config: Option<&Path>) -> Result<LoadedConfig> {
    let loaded = match config {
        Some(path) if path.is_absolute() => load_config_file(path)?,
        Some(path) => load_config_file(&root.join(path))?,
        None => load_config(root)?,
    };
    tracing::info!(path = %loaded.path.display(), "loaded release configuration");
    Ok(loaded)
}

async fn release(
    root: &Path,
    dry_run: bool,
    branch: Option<String>,
    config: Option<&Path>,
) -> Result<()> {
    let loaded = load(root, config)?;
    let config = loaded.release;
    let runner = CliExecutor::shared();

    let branch = match branch {
        Some(branch) => branch,
        None => GitRepository::new(root, runner.clone())
            .current_branch()
            .await
            .wrap_err("Failed to determine the current branch (use --branch)")?,
    };

    let registry =
        PluginRegistry::from_config(&config, runner).map_err(|e| eyre!("{e:#}"))?;

    let context = ReleaseContext::new(root, branch)
        .with_dry_run(dry_run || config.dry_run)
        .with_tag_format(config.tag_format.as_str())
        .with_env(process_env());

    let (events_tx, events_rx) = mpsc::channel(256);
    let printer = tokio::spawn(output::print_events(events_rx));

    let manager = ReleaseManager::new(Arc::new(registry), events_tx);
    let result = manager.release(&config, context).await;
    drop(manager);
    printer.await.wrap_err("Event printer panicked")?;

    let report = result?;
    let failed = report.failed_targets();
    if !failed.is_empty() {
        bail!("{} publish target(s) failed: {}", failed.len(), failed.join(", "));
    }

    Ok(())
}

/// Process environment, without variables whose name or value is not
/// valid Unicode.
fn process_env() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

fn check(root: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let loaded = load(root, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&loaded.release)?);
        return Ok(());
    }

    let release = &loaded.release;
    println!("{} {}", "Configuration".bold(), loaded.path.display());

    let branches: Vec<&str> = release.branches.iter().map(|b| b.name.as_str()).collect();
    println!("{} {}", "Branches".bold(), branches.join(", "));
    println!("{} {}", "Tag format".bold(), release.tag_format);

    println!("{}", "Plugins".bold());
    for (index, name) in release.plugin_names().iter().enumerate() {
        println!("  {}. {}", index + 1, name.cyan());
    }

    println!(
        "{} (concurrency {}{})",
        "Publish".bold(),
        release.publish_concurrency,
        if release.publish_fail_fast { ", fail-fast" } else { "" }
    );
    for target in &release.publish {
        match target {
            PublishTarget::Reference(path) => println!("  - {}", path.cyan()),
            PublishTarget::Image(image) => {
                let images: Vec<&str> = image.image_names.iter().map(String::as_str).collect();
                println!(
                    "  - {} {} on {}",
                    image.path.cyan(),
                    images.join(", "),
                    image.platforms.join(", ")
                );
            }
        }
    }

    println!("{}", "Configuration is valid".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from(["release", "-vv", "run", "--dry-run", "--branch", "main"]);

        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Run {
                dry_run: true,
                branch: Some(ref b),
                config: None,
            } if b == "main"
        ));
    }

    #[test]
    fn test_global_cwd_after_subcommand() {
        let cli = Cli::parse_from(["release", "check", "--json", "--cwd", "/tmp/repo"]);

        assert_eq!(cli.cwd, Some(PathBuf::from("/tmp/repo")));
        assert!(matches!(cli.command, Commands::Check { json: true, .. }));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
