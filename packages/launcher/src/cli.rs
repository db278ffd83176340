//! Command-line interface for the launcher.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use console::style;
use serde::Serialize;

use crate::config::EnvVars;
use crate::engine::ProcessEngine;
use crate::error::{LauncherError, Result};
use crate::launcher::{prepare_run, RunStatus};

/// Behaviour-driven browser test launcher.
///
/// Resolves project paths, loads the environment configuration, validates
/// the requested tags and hands the run to the BDD execution engine.
#[derive(Parser, Debug, Clone)]
#[command(name = "bdd-launcher")]
#[command(version, about, long_about = None)]
#[command(after_help = "Tags are validated against the feature files before the engine starts.")]
pub struct CliOptions {
    /// Name of browser to use (chrome, firefox); comma-separate for multi-browser runs
    #[arg(long, default_value = "chrome")]
    pub browser: String,

    /// Contextual root path for project-specific features, steps, objects etc
    #[arg(long, default_value = "./")]
    pub context: PathBuf,

    /// Disable automatic opening of the test report
    #[arg(long = "disableReport")]
    pub disable_report: bool,

    /// Email the reports to stakeholders
    #[arg(long)]
    pub email: bool,

    /// Path to the feature files
    #[arg(long = "featureFiles", default_value = "features")]
    pub feature_files: PathBuf,

    /// Basename for report files, e.g. `report` for report.json
    #[arg(long = "reportName")]
    pub report_name: Option<String>,

    /// Name of the environment to run the tests in
    #[arg(long, default_value = "test")]
    pub env: String,

    /// Path to shared objects
    #[arg(long = "sharedObjects", default_value = "shared-objects")]
    pub shared_objects: PathBuf,

    /// Path to page objects
    #[arg(long = "pageObjects", default_value = "page-objects")]
    pub page_objects: PathBuf,

    /// Output path for reports
    #[arg(long, default_value = "reports")]
    pub reports: PathBuf,

    /// Path to step definitions
    #[arg(long, default_value = "step_definitions")]
    pub steps: PathBuf,

    /// Only execute features or scenarios with this tag (repeatable)
    #[arg(long, value_name = "EXPRESSION", action = ArgAction::Append)]
    pub tags: Vec<String>,

    /// Update the baseline image after a failed comparison
    #[arg(long = "updateBaselineImage")]
    pub update_baseline_image: bool,

    /// Remote browser service to use, e.g. browserstack or lambdatest
    #[arg(long = "remoteService", default_value = "")]
    pub remote_service: String,

    /// Browser configuration to request from the remote service
    #[arg(long = "remoteConfig")]
    pub remote_config: Option<String>,

    /// Close the browser after each scenario
    #[arg(long = "closeBrowser", value_enum, default_value_t = ClosePolicy::Always)]
    pub close_browser: ClosePolicy,

    /// Deprecated combined remote settings: `<config>/<tag1>,<tag2>`
    #[arg(long = "extraSettings", default_value = "")]
    pub extra_settings: String,

    /// Drive the browser over WebDriver instead of DevTools
    #[arg(long = "wdProtocol")]
    pub wd_protocol: bool,

    /// Fixture script the engine loads before the step definitions
    #[arg(long, default_value = "runtime/world.js")]
    pub bootstrap: PathBuf,

    /// Command line that starts the BDD execution engine
    #[arg(long, env = "BDD_ENGINE", default_value = "npx cucumber-js")]
    pub engine: String,
}

/// When the browser is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClosePolicy {
    /// After every scenario.
    Always,
    /// Never; the browser stays open for inspection.
    No,
}

/// Remote settings decomposed from the combined `<config>/<tags>` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteArguments {
    pub config: String,
    pub tags: Option<String>,
}

/// Parse the combined `<config>/<tags>` argument.
///
/// Segments after the second `/` are ignored.
///
/// # Examples
/// ```
/// use bdd_launcher::cli::parse_remote_arguments;
///
/// let parsed = parse_remote_arguments("chrome/@tag1,@tag2").unwrap();
/// assert_eq!(parsed.config, "chrome");
/// assert_eq!(parsed.tags.as_deref(), Some("@tag1,@tag2"));
/// assert!(parse_remote_arguments("").is_err());
/// ```
pub fn parse_remote_arguments(argument: &str) -> Result<RemoteArguments> {
    if argument.is_empty() {
        return Err(LauncherError::InvalidRemoteArguments(
            "expected a '<config>/<tags>' string".to_string(),
        ));
    }

    let mut segments = argument.split('/');
    let config = segments.next().unwrap_or_default().to_string();
    let tags = segments
        .next()
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    Ok(RemoteArguments { config, tags })
}

/// Split a comma-separated tag expression into individual tags.
#[must_use]
pub fn split_tag_list(expression: &str) -> Vec<String> {
    expression
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run the CLI.
pub fn run() -> Result<RunStatus> {
    let options = CliOptions::parse();
    let env = EnvVars::from_process();
    let cwd = std::env::current_dir()?;

    let prepared = prepare_run(&options, &env, &cwd)?;
    let engine = ProcessEngine::from_command_line(&options.engine)?;

    println!(
        "{} {} on {}{}",
        style("Running").bold(),
        style(prepared.paths.feature_files.display()).cyan(),
        style(&prepared.settings.browser_name).green(),
        prepared
            .remote
            .kind()
            .service_name()
            .map(|s| format!(" via {}", style(s).yellow()))
            .unwrap_or_default()
    );

    prepared.execute(&engine)
}
