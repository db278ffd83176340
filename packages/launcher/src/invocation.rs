//! The argument list handed to the execution engine.
//!
//! The list is built from scratch for every run: feature files first, then
//! formatters, required scripts, tag selections and browser selections.

use std::path::{Path, PathBuf};

use crate::config::PRETTY_FORMATTER;
use crate::paths::ProjectPaths;
use crate::settings::Settings;
use crate::tags::tag_arguments;
use crate::workspace::ReportWorkspace;

/// Arguments for one engine run, plus the files the run reads back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInvocation {
    args: Vec<String>,
    report_file: PathBuf,
    session_id_file: PathBuf,
}

impl EngineInvocation {
    /// Assemble the invocation for validated settings.
    #[must_use]
    pub fn build(settings: &Settings, paths: &ProjectPaths, workspace: &ReportWorkspace) -> Self {
        let mut args = vec![path_arg(&paths.feature_files)];

        args.extend([
            "-f".to_string(),
            PRETTY_FORMATTER.to_string(),
            "-f".to_string(),
            format!("json:{}", workspace.report_file.display()),
        ]);

        // The bootstrap fixture must be required before the step definitions.
        args.extend(["-r".to_string(), path_arg(&paths.bootstrap)]);
        args.extend(["-r".to_string(), path_arg(&paths.steps)]);

        args.extend(tag_arguments(&settings.tags));

        if settings.browsers.len() > 1 {
            for browser in &settings.browsers {
                args.extend(["-b".to_string(), browser.clone()]);
            }
        }

        Self {
            args,
            report_file: workspace.report_file.clone(),
            session_id_file: workspace.session_id_file.clone(),
        }
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn report_file(&self) -> &Path {
        &self.report_file
    }

    #[must_use]
    pub fn session_id_file(&self) -> &Path {
        &self.session_id_file
    }

    /// Values following every occurrence of `flag`, in order.
    #[must_use]
    pub fn values_of(&self, flag: &str) -> Vec<&str> {
        self.args
            .windows(2)
            .filter(|pair| pair[0] == flag)
            .map(|pair| pair[1].as_str())
            .collect()
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
