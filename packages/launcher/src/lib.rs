//! BDD Launcher - bootstrap behaviour-driven browser test runs.
//!
//! This crate turns command-line options into a fully configured run of an
//! external BDD execution engine: it loads the environment configuration,
//! resolves project paths, validates requested tags against the feature
//! files, picks the remote browser service and builds the engine's argument
//! list.
//!
//! # Example
//!
//! ```
//! use bdd_launcher::remote::{RemoteKind, RemoteServiceResolver};
//! use bdd_launcher::tags::{tags_in_text, validate_tags};
//!
//! let found = tags_in_text("@smoke\nFeature: Login");
//! assert!(validate_tags(&["@smoke".to_string()], &found).is_ok());
//!
//! let remote = RemoteServiceResolver::default().resolve("browserstack");
//! assert_eq!(remote.kind(), RemoteKind::BrowserStack);
//! ```
//!
//! # Architecture
//!
//! - [`cli`]: Command-line options and the combined remote argument parser
//! - [`config`]: Constants, process environment and environment config files
//! - [`settings`]: Assembly of the run settings
//! - [`paths`]: Project path resolution
//! - [`tags`]: Tag discovery and validation
//! - [`remote`]: Remote service resolution and result submission
//! - [`registry`]: Shared and page object registries
//! - [`workspace`]: Report folders and optional capabilities
//! - [`invocation`]: Engine argument list
//! - [`context`]: Run context handed to the fixtures
//! - [`engine`]: Engine delegation
//! - [`launcher`]: Main launcher service
//! - [`error`]: Error types and Result alias

pub mod cli;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod http;
pub mod invocation;
pub mod launcher;
pub mod paths;
pub mod registry;
pub mod remote;
pub mod settings;
pub mod tags;
pub mod workspace;

// Re-export main functions
pub use launcher::{prepare_run, prepare_with_settings, PreparedRun, RunStatus};

// Re-export commonly used items
pub use cli::CliOptions;
pub use error::{ErrorCategory, LauncherError, Result};
pub use remote::{resolve, RemoteDescriptor, RemoteKind};
pub use settings::Settings;
