//! Error types for the launcher.
//!
//! Every fatal condition is a `LauncherError` variant. Callers that need
//! to decide on an exit code group variants with [`LauncherError::category`].

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the launcher library.
#[derive(Debug, Error)]
pub enum LauncherError {
    /// No environment configuration file was found.
    #[error("No environment configuration found for '{module}' (searched from {start})")]
    EnvConfigNotFound { module: String, start: PathBuf },

    /// An environment configuration file exists but could not be parsed.
    #[error("Failed to parse environment configuration {path}: {message}")]
    EnvConfigParse { path: PathBuf, message: String },

    /// The combined `<config>/<tags>` argument was empty or malformed.
    #[error("Invalid remote arguments: {0}")]
    InvalidRemoteArguments(String),

    /// Tags were requested both through `--tags` and the combined argument.
    #[error("Cannot specify tags two ways: use either --tags or the <config>/<tags> form")]
    ConflictingTags,

    /// The remote config was given twice with different values.
    #[error("Conflicting remote config: '{typed}' from --remoteConfig and '{combined}' from --extraSettings")]
    ConflictingRemoteConfig { typed: String, combined: String },

    /// The feature files location does not exist.
    #[error("Feature files not found at {0}")]
    FeatureFilesNotFound(PathBuf),

    /// A requested tag does not start with `@`.
    #[error("Tags must start with a @: '{0}'")]
    InvalidTagFormat(String),

    /// A requested tag does not occur in any feature file.
    #[error("This tag {0} does not exist in the feature files")]
    UnknownTag(String),

    /// The engine command line was empty.
    #[error("No execution engine command configured")]
    EmptyEngineCommand,

    /// The execution engine process could not be started.
    #[error("Failed to start execution engine '{program}': {source}")]
    EngineSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The remote service API rejected a result submission.
    #[error("{service} API error (status {status}): {message}")]
    RemoteApi {
        service: String,
        status: u16,
        message: String,
    },

    /// A remote service API base URL could not be used.
    #[error("Invalid {service} API endpoint '{url}': {message}")]
    InvalidEndpoint {
        service: String,
        url: String,
        message: String,
    },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Coarse grouping of errors, used to pick a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or malformed configuration, detected before delegation.
    Configuration,
    /// Malformed or unknown tag.
    Validation,
    /// The execution engine could not be driven.
    Delegation,
    /// Filesystem, network or serialization failure.
    Io,
}

impl LauncherError {
    /// Classify this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EnvConfigNotFound { .. }
            | Self::EnvConfigParse { .. }
            | Self::InvalidRemoteArguments(_)
            | Self::ConflictingTags
            | Self::ConflictingRemoteConfig { .. }
            | Self::FeatureFilesNotFound(_) => ErrorCategory::Configuration,
            Self::InvalidTagFormat(_) | Self::UnknownTag(_) => ErrorCategory::Validation,
            Self::EmptyEngineCommand | Self::EngineSpawn { .. } => ErrorCategory::Delegation,
            Self::RemoteApi { .. }
            | Self::InvalidEndpoint { .. }
            | Self::Http(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Yaml(_) => ErrorCategory::Io,
        }
    }

    /// Whether this error aborts the run before the engine is started.
    #[must_use]
    pub fn is_fatal_setup_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Configuration | ErrorCategory::Validation
        )
    }
}

/// Result type alias for launcher operations.
pub type Result<T> = std::result::Result<T, LauncherError>;
