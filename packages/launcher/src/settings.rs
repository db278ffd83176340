//! Assembly of the run settings from CLI options, the environment
//! configuration file and process environment variables.
//!
//! Settings are built once, before any path resolution, remote resolution
//! or tag validation happens, and are passed explicitly from then on.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::cli::{parse_remote_arguments, split_tag_list, ClosePolicy, CliOptions};
use crate::config::{
    env_config_module, search_env_config, DataConfig, EnvConfig, EnvVars, DATE_FORMAT,
    DATE_TIME_FORMAT, DEFAULT_REPORT_NAME, ENVIRONMENT_VAR, PROJECT_NAME_VAR, REPORT_NAME_VAR,
};
use crate::error::{LauncherError, Result};
use crate::paths::absolutize;

/// Browser used when `--browser` lists none.
const DEFAULT_BROWSER: &str = "chrome";

/// Resolved settings for one run. Read-only once assembled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub project_root: PathBuf,
    /// Every browser requested with `--browser`, in order.
    pub browsers: Vec<String>,
    /// Browser the reports are filed under: the remote config when given,
    /// otherwise the first requested browser.
    pub browser_name: String,
    pub remote_service: String,
    pub remote_config: Option<String>,
    pub report_name: String,
    pub project_name: Option<String>,
    pub close_browser: ClosePolicy,
    pub disable_report: bool,
    pub email: bool,
    pub update_baseline_image: bool,
    pub webdriver_protocol: bool,
    pub env_name: String,
    pub environment: Option<serde_json::Value>,
    pub data_config: DataConfig,
    /// Tags to run, after decomposing the combined remote argument.
    pub tags: Vec<String>,
    pub date: String,
    pub date_time: String,
}

/// Remote config and tags after merging the typed and combined forms.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RemoteSelection {
    remote_config: Option<String>,
    tags: Vec<String>,
}

fn merge_remote_selection(options: &CliOptions) -> Result<RemoteSelection> {
    let mut selection = RemoteSelection {
        remote_config: options.remote_config.clone().filter(|c| !c.is_empty()),
        tags: options.tags.clone(),
    };

    if options.extra_settings.is_empty() {
        return Ok(selection);
    }
    if options.remote_service.is_empty() {
        tracing::warn!(
            extra_settings = %options.extra_settings,
            "--extraSettings is ignored without --remoteService"
        );
        return Ok(selection);
    }

    tracing::warn!("--extraSettings is deprecated, use --remoteConfig and --tags");
    let combined = parse_remote_arguments(&options.extra_settings)?;

    if !combined.config.is_empty() {
        if let Some(typed) = &selection.remote_config {
            if *typed != combined.config {
                return Err(LauncherError::ConflictingRemoteConfig {
                    typed: typed.clone(),
                    combined: combined.config,
                });
            }
        }
        selection.remote_config = Some(combined.config);
    }

    if let Some(tags) = combined.tags {
        if !selection.tags.is_empty() {
            return Err(LauncherError::ConflictingTags);
        }
        selection.tags = split_tag_list(&tags);
    }

    if let Some(config) = &selection.remote_config {
        check_folder_name(config)?;
    }
    Ok(selection)
}

/// The remote config names the report folder; it must stay a single
/// path component.
fn check_folder_name(config: &str) -> Result<()> {
    if config.contains(['/', '\\']) || config == "." || config == ".." {
        return Err(LauncherError::InvalidRemoteArguments(format!(
            "remote config '{config}' must not contain path separators or be '.' or '..'"
        )));
    }
    Ok(())
}

fn browser_list(browser: &str) -> Vec<String> {
    let browsers: Vec<String> = browser
        .split(',')
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect();
    if browsers.is_empty() {
        vec![DEFAULT_BROWSER.to_string()]
    } else {
        browsers
    }
}

/// Merge CLI options, environment configuration and process environment.
///
/// Each derived value prefers the process environment, then the
/// environment configuration, then the CLI value or default.
pub fn assemble(
    options: &CliOptions,
    env_config: &EnvConfig,
    env: &EnvVars,
    cwd: &Path,
    now: DateTime<Local>,
) -> Result<Settings> {
    let selection = merge_remote_selection(options)?;
    let browsers = browser_list(&options.browser);
    let browser_name = selection
        .remote_config
        .clone()
        .unwrap_or_else(|| browsers[0].clone());

    let project_name = env
        .get(PROJECT_NAME_VAR)
        .map(str::to_string)
        .or_else(|| env_config.data_config.project_name.clone());

    let report_name = env
        .get(REPORT_NAME_VAR)
        .map(str::to_string)
        .or_else(|| env_config.data_config.report_name.clone())
        .or_else(|| options.report_name.clone())
        .unwrap_or_else(|| DEFAULT_REPORT_NAME.to_string());

    let environment = match env.get(ENVIRONMENT_VAR) {
        Some(value) => Some(serde_json::Value::String(value.to_string())),
        None => env_config.environment_for(&options.env).cloned(),
    };
    if environment.is_none() {
        tracing::warn!(env = %options.env, "No configuration for the selected environment");
    }

    let settings = Settings {
        project_root: absolutize(cwd, &options.context),
        browsers,
        browser_name,
        remote_service: options.remote_service.clone(),
        remote_config: selection.remote_config,
        report_name,
        project_name,
        close_browser: options.close_browser,
        disable_report: options.disable_report,
        email: options.email,
        update_baseline_image: options.update_baseline_image,
        webdriver_protocol: options.wd_protocol,
        env_name: options.env.clone(),
        environment,
        data_config: env_config.data_config.clone(),
        tags: selection.tags,
        date: now.format(DATE_FORMAT).to_string(),
        date_time: now.format(DATE_TIME_FORMAT).to_string(),
    };

    tracing::debug!(
        project_root = %settings.project_root.display(),
        browser = %settings.browser_name,
        remote_service = %settings.remote_service,
        tags = ?settings.tags,
        "Assembled settings"
    );
    Ok(settings)
}

/// Locate the environment configuration and assemble settings from it.
pub fn load_settings(options: &CliOptions, env: &EnvVars, cwd: &Path) -> Result<Settings> {
    let module = env_config_module(env);
    let loaded = search_env_config(module, cwd)?;
    assemble(options, &loaded.config, env, cwd, Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn options(args: &[&str]) -> CliOptions {
        CliOptions::parse_from(std::iter::once("bdd-launcher").chain(args.iter().copied()))
    }

    fn env_config() -> EnvConfig {
        serde_json::from_value(serde_json::json!({
            "dataConfig": { "projectName": "shop" },
            "environment": { "test": { "url": "https://test.shop" }, "uat": "uat-host" }
        }))
        .unwrap()
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap()
    }

    fn build(args: &[&str], env: &EnvVars) -> Result<Settings> {
        assemble(&options(args), &env_config(), env, Path::new("/work"), now())
    }

    #[test]
    fn test_defaults() {
        let settings = build(&[], &EnvVars::default()).unwrap();

        assert_eq!(settings.project_root, PathBuf::from("/work"));
        assert_eq!(settings.browsers, vec!["chrome"]);
        assert_eq!(settings.browser_name, "chrome");
        assert_eq!(settings.report_name, "Automated Report");
        assert_eq!(settings.project_name.as_deref(), Some("shop"));
        assert_eq!(
            settings.environment,
            Some(serde_json::json!({ "url": "https://test.shop" }))
        );
        assert_eq!(settings.close_browser, ClosePolicy::Always);
        assert_eq!(settings.date, "04-03-2026");
        assert_eq!(settings.date_time, "04-03-2026-050607");
        assert!(settings.tags.is_empty());
        assert!(settings.remote_config.is_none());
    }

    #[test]
    fn test_process_env_takes_precedence() {
        let env = EnvVars::from_pairs([
            ("PROJECT_NAME", "override"),
            ("REPORT_NAME", "nightly"),
            ("ENVIRONMENT", "https://ci.shop"),
        ]);
        let settings = build(&["--reportName", "cli-report"], &env).unwrap();

        assert_eq!(settings.project_name.as_deref(), Some("override"));
        assert_eq!(settings.report_name, "nightly");
        assert_eq!(settings.environment, Some(serde_json::json!("https://ci.shop")));
    }

    #[test]
    fn test_report_name_from_cli_when_unset_elsewhere() {
        let settings = build(&["--reportName", "cli-report"], &EnvVars::default()).unwrap();
        assert_eq!(settings.report_name, "cli-report");
    }

    #[test]
    fn test_unknown_environment_is_none() {
        let settings = build(&["--env", "prod"], &EnvVars::default()).unwrap();
        assert!(settings.environment.is_none());
    }

    #[test]
    fn test_relative_context() {
        let settings = build(&["--context", "projects/shop"], &EnvVars::default()).unwrap();
        assert_eq!(settings.project_root, PathBuf::from("/work/projects/shop"));
    }

    #[test]
    fn test_multi_browser_list() {
        let settings = build(&["--browser", "firefox, chrome"], &EnvVars::default()).unwrap();
        assert_eq!(settings.browsers, vec!["firefox", "chrome"]);
        assert_eq!(settings.browser_name, "firefox");
    }

    #[test]
    fn test_combined_remote_arguments() {
        let settings = build(
            &[
                "--remoteService",
                "browserstack",
                "--extraSettings",
                "safari/@smoke,@cart",
            ],
            &EnvVars::default(),
        )
        .unwrap();

        assert_eq!(settings.remote_config.as_deref(), Some("safari"));
        assert_eq!(settings.browser_name, "safari");
        assert_eq!(settings.tags, vec!["@smoke", "@cart"]);
    }

    #[test]
    fn test_typed_remote_config() {
        let settings = build(
            &["--remoteService", "lambdatest", "--remoteConfig", "edge"],
            &EnvVars::default(),
        )
        .unwrap();
        assert_eq!(settings.browser_name, "edge");
    }

    #[test]
    fn test_combined_arguments_ignored_without_remote_service() {
        let settings = build(&["--extraSettings", "safari/@smoke"], &EnvVars::default()).unwrap();
        assert!(settings.remote_config.is_none());
        assert!(settings.tags.is_empty());
    }

    #[test]
    fn test_tags_two_ways_conflict() {
        let err = build(
            &[
                "--remoteService",
                "browserstack",
                "--extraSettings",
                "safari/@smoke",
                "--tags",
                "@cart",
            ],
            &EnvVars::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LauncherError::ConflictingTags));
    }

    #[test]
    fn test_remote_config_two_ways_conflict() {
        let err = build(
            &[
                "--remoteService",
                "browserstack",
                "--remoteConfig",
                "edge",
                "--extraSettings",
                "safari",
            ],
            &EnvVars::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LauncherError::ConflictingRemoteConfig { .. }));
    }

    #[test]
    fn test_remote_config_must_be_single_folder() {
        for args in [
            ["--remoteService", "browserstack", "--remoteConfig", "../../x"],
            ["--remoteService", "browserstack", "--remoteConfig", "a\\b"],
            ["--remoteService", "browserstack", "--extraSettings", "../@smoke"],
            ["--remoteService", "lambdatest", "--extraSettings", "../../x"],
        ] {
            let err = build(&args, &EnvVars::default()).unwrap_err();
            assert!(
                matches!(err, LauncherError::InvalidRemoteArguments(_)),
                "{args:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_combined_config_only_keeps_cli_tags() {
        let settings = build(
            &[
                "--remoteService",
                "browserstack",
                "--extraSettings",
                "safari",
                "--tags",
                "@cart",
            ],
            &EnvVars::default(),
        )
        .unwrap();
        assert_eq!(settings.tags, vec!["@cart"]);
    }
}
