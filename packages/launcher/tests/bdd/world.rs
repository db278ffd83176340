//! World struct for Cucumber BDD tests
//!
//! Contains the test state that persists across steps in a scenario.

use std::fs;

use cucumber::World;
use tempfile::TempDir;

use bdd_launcher::cli::RemoteArguments;
use bdd_launcher::{LauncherError, RemoteDescriptor};

/// Test world that holds state across steps in a Cucumber scenario.
#[derive(Debug, Default, World)]
pub struct LauncherWorld {
    /// Feature corpus for the current scenario
    pub corpus: Option<TempDir>,
    /// Number of feature files written so far
    pub files: usize,
    /// Tags requested by the scenario
    pub requested: Vec<String>,
    /// Outcome of tag validation
    pub validation: Option<Result<(), LauncherError>>,
    /// Parsed combined remote argument
    pub remote_arguments: Option<Result<RemoteArguments, LauncherError>>,
    /// Resolved remote service
    pub remote: Option<RemoteDescriptor>,
}

impl LauncherWorld {
    /// Write another feature file into the scenario's corpus.
    pub fn add_feature(&mut self, content: &str) {
        let corpus = self
            .corpus
            .get_or_insert_with(|| tempfile::tempdir().expect("tempdir"));
        let path = corpus.path().join(format!("scenario_{}.feature", self.files));
        fs::write(path, format!("{content}\nFeature: Generated\n")).expect("write feature");
        self.files += 1;
    }
}
