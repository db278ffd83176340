//! Report folders, capture files and optional runtime capabilities.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{RUN_CONTEXT_FILE, SESSION_ID_FILE};
use crate::paths::ProjectPaths;
use crate::settings::Settings;

/// Accessibility helper, relative to the project root.
pub const ACCESSIBILITY_LIB: &str = "runtime/accessibility/accessibilityLib.js";

/// Video link helper, relative to the project root.
pub const VIDEO_LIB: &str = "runtime/getVideoLinks.js";

/// Locations of everything a run writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportWorkspace {
    pub browser_dir: PathBuf,
    pub accessibility_dir: PathBuf,
    pub report_file: PathBuf,
    pub user_agent_file: PathBuf,
    pub session_id_file: PathBuf,
    pub run_context_file: PathBuf,
}

impl ReportWorkspace {
    /// Derive the run's output locations; nothing is created yet.
    #[must_use]
    pub fn new(settings: &Settings, paths: &ProjectPaths) -> Self {
        let browser_dir = paths.reports.join(&settings.browser_name);
        Self {
            accessibility_dir: browser_dir.join("accessibility"),
            report_file: browser_dir.join(format!(
                "{}-{}.json",
                settings.report_name, settings.date_time
            )),
            user_agent_file: paths.shared_objects.join("docs").join("userAgent.txt"),
            session_id_file: browser_dir.join(SESSION_ID_FILE),
            run_context_file: browser_dir.join(RUN_CONTEXT_FILE),
            browser_dir,
        }
    }

    /// Create folders and capture files that do not exist yet, and clear
    /// the session id left behind by an earlier run.
    ///
    /// Other existing content is left untouched. Failures are logged; the
    /// run continues without the affected output.
    pub fn prepare(&self) {
        for dir in [&self.browser_dir, &self.accessibility_dir] {
            if let Err(e) = fs::create_dir_all(dir) {
                tracing::error!(path = %dir.display(), error = %e, "Failed to create report folder");
            }
        }
        if let Err(e) = ensure_file(&self.user_agent_file) {
            tracing::error!(
                path = %self.user_agent_file.display(),
                error = %e,
                "Failed to create user agent file"
            );
        }
        self.clear_session_id();
    }

    fn clear_session_id(&self) {
        match fs::remove_file(&self.session_id_file) {
            Ok(()) => tracing::debug!(
                path = %self.session_id_file.display(),
                "Removed session id from a previous run"
            ),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.session_id_file.display(), "No stale session id");
            }
            Err(e) => tracing::error!(
                path = %self.session_id_file.display(),
                error = %e,
                "Failed to remove stale session id"
            ),
        }
    }
}

/// Create `path` (and its parents) if missing, never truncating it.
fn ensure_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)?;
    Ok(())
}

/// Optional helpers found in the project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub accessibility: Option<PathBuf>,
    pub video: Option<PathBuf>,
}

impl Capabilities {
    /// Look for the optional helpers under `project_root`.
    #[must_use]
    pub fn probe(project_root: &Path) -> Self {
        let find = |relative: &str, missing: &str| {
            let path = project_root.join(relative);
            if path.is_file() {
                Some(path)
            } else {
                tracing::warn!(path = %path.display(), "{missing}");
                None
            }
        };

        Self {
            accessibility: find(ACCESSIBILITY_LIB, "No Accessibility Lib"),
            video: find(VIDEO_LIB, "No Video Lib"),
        }
    }
}
