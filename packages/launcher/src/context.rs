//! Run context handed to the engine-side fixtures.
//!
//! The fixtures get no ambient state from the launcher. Everything they
//! need is written to one JSON document whose location is passed in the
//! `LAUNCHER_CONTEXT` environment variable.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::paths::ProjectPaths;
use crate::registry::ObjectRegistry;
use crate::remote::RemoteKind;
use crate::settings::Settings;
use crate::workspace::{Capabilities, ReportWorkspace};

/// Everything the fixtures read at startup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunContext<'a> {
    pub settings: &'a Settings,
    pub paths: &'a ProjectPaths,
    pub workspace: &'a ReportWorkspace,
    pub remote: RemoteKind,
    pub capabilities: &'a Capabilities,
    pub shared_objects: &'a ObjectRegistry,
    pub page_objects: &'a ObjectRegistry,
}

impl RunContext<'_> {
    /// Serialize to `path`, creating parent folders as needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        tracing::debug!(path = %path.display(), "Wrote run context");
        Ok(())
    }
}
