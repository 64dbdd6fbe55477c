//! Subprocess execution for plugins and publishers.
//!
//! Every external tool (`git`, `docker`, `gh`) is spawned through the
//! [`CommandRunner`] seam so tests can swap the real executor for a
//! [`RecordingRunner`].

use crate::plugins::base::PluginError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::process::Command;
use tracing::debug;

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub envs: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child process only.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Program and arguments joined by spaces. Environment values are left
    /// out so tokens never reach logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured output of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion. A non-zero exit is an error.
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, PluginError>;

    /// Whether `program` can be found on `PATH`.
    fn is_available(&self, program: &str) -> bool;
}

/// Runs commands with `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CliExecutor;

impl CliExecutor {
    pub fn shared() -> Arc<dyn CommandRunner> {
        Arc::new(Self)
    }
}

#[async_trait]
impl CommandRunner for CliExecutor {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, PluginError> {
        let command_line = invocation.command_line();
        debug!(command = %command_line, cwd = %invocation.cwd.display(), "spawning command");

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                PluginError::ExecutionError(format!(
                    "Failed to spawn command '{}': {}",
                    invocation.program, e
                ))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let status = match output.status.code() {
                Some(code) => format!("exit code {code}"),
                None => "a signal".to_string(),
            };
            debug!(command = %command_line, %status, "command failed");
            return Err(PluginError::CommandFailed {
                command: command_line,
                status,
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }

    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

#[derive(Debug, Clone)]
enum Response {
    Stdout(String),
    Fail(String),
}

/// A [`CommandRunner`] that records invocations instead of spawning them.
///
/// Responses are matched by substring against the command line; the first
/// matching rule wins. Unmatched commands succeed with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    responses: Vec<(String, Response)>,
    unavailable: Vec<String>,
    invocations: Mutex<Vec<Invocation>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands containing `pattern` with `stdout`.
    pub fn respond_to(mut self, pattern: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.responses
            .push((pattern.into(), Response::Stdout(stdout.into())));
        self
    }

    /// Fail commands containing `pattern` with `stderr`.
    pub fn fail_on(mut self, pattern: impl Into<String>, stderr: impl Into<String>) -> Self {
        self.responses.push((pattern.into(), Response::Fail(stderr.into())));
        self
    }

    /// Report `program` as missing from `PATH`.
    pub fn unavailable(mut self, program: impl Into<String>) -> Self {
        self.unavailable.push(program.into());
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.invocations()
            .iter()
            .map(Invocation::command_line)
            .collect()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, PluginError> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(invocation.clone());

        let command_line = invocation.command_line();
        let response = self
            .responses
            .iter()
            .find(|(pattern, _)| command_line.contains(pattern.as_str()))
            .map(|(_, response)| response.clone());

        match response {
            Some(Response::Stdout(stdout)) => Ok(CommandOutput {
                stdout,
                stderr: String::new(),
            }),
            Some(Response::Fail(stderr)) => Err(PluginError::CommandFailed {
                command: command_line,
                status: "exit code 1".to_string(),
                stderr,
            }),
            None => Ok(CommandOutput::default()),
        }
    }

    fn is_available(&self, program: &str) -> bool {
        !self.unavailable.iter().any(|p| p == program)
    }
}
