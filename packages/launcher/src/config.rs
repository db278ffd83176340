//! Configuration constants, process environment access and environment
//! configuration file loading.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LauncherError, Result};

/// Environment variable naming the environment configuration module.
pub const ENV_CONFIG_VAR: &str = "ENV_CONFIG";

/// Environment variable overriding the project name.
pub const PROJECT_NAME_VAR: &str = "PROJECT_NAME";

/// Environment variable overriding the report name.
pub const REPORT_NAME_VAR: &str = "REPORT_NAME";

/// Environment variable overriding the selected environment.
pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";

/// Environment variable through which the engine finds the run context.
pub const CONTEXT_VAR: &str = "LAUNCHER_CONTEXT";

/// Module name searched for when `ENV_CONFIG` is unset.
pub const DEFAULT_ENV_CONFIG_MODULE: &str = "envConfig";

/// Report basename used when nothing else configures one.
pub const DEFAULT_REPORT_NAME: &str = "Automated Report";

/// Formatter the engine uses for console output.
pub const PRETTY_FORMATTER: &str = "@cucumber/pretty-formatter";

/// Run context file written next to the reports.
pub const RUN_CONTEXT_FILE: &str = "run-context.json";

/// File in which the bootstrap fixture records the remote session id.
pub const SESSION_ID_FILE: &str = "session-id.txt";

/// HTTP timeout in seconds for remote result submission.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Date format for the run date.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Timestamp format embedded in report file names.
pub const DATE_TIME_FORMAT: &str = "%d-%m-%Y-%H%M%S";

/// Snapshot of the process environment.
///
/// Empty values are treated as unset, so `FOO=` never overrides a
/// configured value.
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    vars: HashMap<String, String>,
}

impl EnvVars {
    /// Capture the current process environment. Non-Unicode entries are skipped.
    #[must_use]
    pub fn from_process() -> Self {
        Self::from_pairs(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// Build a snapshot from explicit pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a non-empty variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Project-wide data section of the environment configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_data: Option<serde_json::Value>,

    /// Any other project data, handed through to the fixtures untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Environment configuration: `{ dataConfig, environment }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvConfig {
    pub data_config: DataConfig,

    /// Environment name to environment-specific values.
    pub environment: BTreeMap<String, serde_json::Value>,
}

impl EnvConfig {
    /// Values configured for a named environment.
    #[must_use]
    pub fn environment_for(&self, name: &str) -> Option<&serde_json::Value> {
        self.environment.get(name)
    }
}

/// An environment configuration together with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedEnvConfig {
    pub path: PathBuf,
    pub config: EnvConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    PackageJson,
    Json,
    Yaml,
}

/// Candidate file names for a module, in search order.
fn candidates(module: &str) -> Vec<(String, SourceFormat)> {
    vec![
        ("package.json".to_string(), SourceFormat::PackageJson),
        (format!(".{module}rc"), SourceFormat::Yaml),
        (format!(".{module}rc.json"), SourceFormat::Json),
        (format!(".{module}rc.yaml"), SourceFormat::Yaml),
        (format!(".{module}rc.yml"), SourceFormat::Yaml),
        (format!("{module}.config.json"), SourceFormat::Json),
        (format!("{module}.config.yaml"), SourceFormat::Yaml),
        (format!("{module}.config.yml"), SourceFormat::Yaml),
    ]
}

/// Module name to search for, honouring `ENV_CONFIG`.
#[must_use]
pub fn env_config_module(env: &EnvVars) -> &str {
    env.get(ENV_CONFIG_VAR).unwrap_or(DEFAULT_ENV_CONFIG_MODULE)
}

/// Search `start` and its ancestors for an environment configuration.
///
/// The first directory containing a matching file wins. A `package.json`
/// only matches when it has a top-level key named after the module.
///
/// # Examples
/// ```no_run
/// use std::path::Path;
/// use bdd_launcher::config::search_env_config;
///
/// let loaded = search_env_config("envConfig", Path::new(".")).unwrap();
/// println!("using {}", loaded.path.display());
/// ```
pub fn search_env_config(module: &str, start: &Path) -> Result<LoadedEnvConfig> {
    for dir in start.ancestors() {
        for (file_name, format) in candidates(module) {
            let path = dir.join(&file_name);
            if !path.is_file() {
                continue;
            }
            tracing::debug!(path = %path.display(), "Checking environment config candidate");
            if let Some(config) = load_candidate(&path, format, module)? {
                tracing::info!(path = %path.display(), "Loaded environment config");
                return Ok(LoadedEnvConfig { path, config });
            }
        }
    }

    Err(LauncherError::EnvConfigNotFound {
        module: module.to_string(),
        start: start.to_path_buf(),
    })
}

fn load_candidate(path: &Path, format: SourceFormat, module: &str) -> Result<Option<EnvConfig>> {
    let content = fs::read_to_string(path)?;
    let parse_error = |message: String| LauncherError::EnvConfigParse {
        path: path.to_path_buf(),
        message,
    };

    match format {
        SourceFormat::PackageJson => {
            let mut manifest: serde_json::Value =
                serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?;
            match manifest.get_mut(module).map(serde_json::Value::take) {
                Some(section) => serde_json::from_value(section)
                    .map(Some)
                    .map_err(|e| parse_error(e.to_string())),
                None => Ok(None),
            }
        }
        SourceFormat::Json => serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| parse_error(e.to_string())),
        SourceFormat::Yaml => serde_yaml_ng::from_str(&content)
            .map(Some)
            .map_err(|e| parse_error(e.to_string())),
    }
}
