//! BDD Test Runner for the launcher
//!
//! Runs the Gherkin scenarios under `tests/features`.
//!
//! # Usage
//!
//! ```bash
//! cargo test --test bdd -- --nocapture
//! ```

// Allow panic/expect in test code - these are appropriate for test setup
#![allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]

mod steps;
mod world;

use cucumber::World;
use std::path::Path;

#[tokio::main]
async fn main() {
    // Initialize tracing subscriber (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .init();

    let features_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("features");

    if !features_dir.exists() {
        panic!("Features directory not found: {}", features_dir.display());
    }

    world::LauncherWorld::cucumber()
        .max_concurrent_scenarios(1)
        .with_default_cli()
        .run_and_exit(features_dir)
        .await;
}
