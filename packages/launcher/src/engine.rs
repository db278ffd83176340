//! Delegation to the external BDD execution engine.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::CONTEXT_VAR;
use crate::error::{LauncherError, Result};
use crate::invocation::EngineInvocation;

/// What the engine reported once the run finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Whether every scenario passed.
    pub succeeded: bool,
    /// Remote browser session, when the fixture recorded one.
    pub session_id: Option<String>,
    /// JSON report the engine was asked to write.
    pub report: PathBuf,
}

/// Runs a fully assembled invocation.
pub trait ExecutionEngine {
    /// Execute the run and block until it finishes.
    ///
    /// `context_file` is the serialized run context the fixtures read.
    fn run(&self, invocation: &EngineInvocation, context_file: &Path) -> Result<RunOutcome>;
}

/// Starts the engine as a child process and waits for it.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: String,
    base_args: Vec<String>,
}

impl ProcessEngine {
    /// Build from a whitespace-separated command line, e.g. `npx cucumber-js`.
    pub fn from_command_line(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(LauncherError::EmptyEngineCommand)?;
        Ok(Self {
            program,
            base_args: parts.collect(),
        })
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn base_args(&self) -> &[String] {
        &self.base_args
    }
}

impl ExecutionEngine for ProcessEngine {
    fn run(&self, invocation: &EngineInvocation, context_file: &Path) -> Result<RunOutcome> {
        tracing::info!(
            program = %self.program,
            args = ?invocation.args(),
            "Starting execution engine"
        );

        let status = Command::new(&self.program)
            .args(&self.base_args)
            .args(invocation.args())
            .env(CONTEXT_VAR, context_file)
            .status()
            .map_err(|source| LauncherError::EngineSpawn {
                program: self.program.clone(),
                source,
            })?;

        tracing::info!(code = ?status.code(), "Execution engine finished");

        Ok(RunOutcome {
            succeeded: status.success(),
            session_id: read_session_id(invocation.session_id_file()),
            report: invocation.report_file().to_path_buf(),
        })
    }
}

/// Read the session id the fixture recorded, if any.
#[must_use]
pub fn read_session_id(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content.trim().to_string()).filter(|s| !s.is_empty()),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "No remote session id recorded");
            None
        }
    }
}
