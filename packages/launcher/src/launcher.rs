//! Main launcher service: turns CLI options into a prepared run and hands
//! it to the execution engine.

use std::path::Path;

use crate::cli::CliOptions;
use crate::config::EnvVars;
use crate::context::RunContext;
use crate::engine::ExecutionEngine;
use crate::error::Result;
use crate::invocation::EngineInvocation;
use crate::paths::{PathResolver, ProjectPaths};
use crate::registry::ObjectRegistry;
use crate::remote::{RemoteDescriptor, RemoteServiceResolver};
use crate::settings::{load_settings, Settings};
use crate::tags::check_requested_tags;
use crate::workspace::{Capabilities, ReportWorkspace};

/// Overall result of a delegated run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Passed,
    Failed,
}

impl RunStatus {
    /// Process exit code for this status.
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Passed => 0,
            RunStatus::Failed => 1,
        }
    }
}

/// A fully configured run, ready for the engine.
#[derive(Debug)]
pub struct PreparedRun {
    pub settings: Settings,
    pub paths: ProjectPaths,
    pub remote: RemoteDescriptor,
    pub workspace: ReportWorkspace,
    pub capabilities: Capabilities,
    pub shared_objects: ObjectRegistry,
    pub page_objects: ObjectRegistry,
    pub invocation: EngineInvocation,
}

/// Load configuration and prepare a run.
///
/// Fails before anything is delegated on configuration errors, malformed
/// tags and tags that do not occur in the feature files.
pub fn prepare_run(options: &CliOptions, env: &EnvVars, cwd: &Path) -> Result<PreparedRun> {
    let settings = load_settings(options, env, cwd)?;
    prepare_with_settings(options, settings, &RemoteServiceResolver::new(env))
}

/// Prepare a run from already assembled settings.
pub fn prepare_with_settings(
    options: &CliOptions,
    settings: Settings,
    resolver: &RemoteServiceResolver,
) -> Result<PreparedRun> {
    let paths = ProjectPaths::resolve(&PathResolver::new(&settings.project_root), options);
    let remote = resolver.resolve(&settings.remote_service);

    check_requested_tags(&settings.tags, &paths.feature_files)?;

    let workspace = ReportWorkspace::new(&settings, &paths);
    let capture_files = [workspace.user_agent_file.as_path()];
    let shared_objects = ObjectRegistry::load_excluding(&paths.shared_objects, &capture_files)?;
    let page_objects = ObjectRegistry::load_excluding(&paths.page_objects, &capture_files)?;

    // Registries are read before the capture files are created.
    workspace.prepare();
    let capabilities = Capabilities::probe(&settings.project_root);

    let invocation = EngineInvocation::build(&settings, &paths, &workspace);

    Ok(PreparedRun {
        settings,
        paths,
        remote,
        workspace,
        capabilities,
        shared_objects,
        page_objects,
        invocation,
    })
}

impl PreparedRun {
    /// The context document the fixtures read.
    #[must_use]
    pub fn context(&self) -> RunContext<'_> {
        RunContext {
            settings: &self.settings,
            paths: &self.paths,
            workspace: &self.workspace,
            remote: self.remote.kind(),
            capabilities: &self.capabilities,
            shared_objects: &self.shared_objects,
            page_objects: &self.page_objects,
        }
    }

    /// Write the run context, run the engine, then call the remote hook once.
    pub fn execute(&self, engine: &dyn ExecutionEngine) -> Result<RunStatus> {
        self.context().write(&self.workspace.run_context_file)?;

        let outcome = engine.run(&self.invocation, &self.workspace.run_context_file)?;
        self.remote.after(&outcome);

        if outcome.succeeded {
            Ok(RunStatus::Passed)
        } else {
            tracing::warn!(report = %outcome.report.display(), "Execution engine reported failures");
            Ok(RunStatus::Failed)
        }
    }
}
