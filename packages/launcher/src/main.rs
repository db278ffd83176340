//! CLI entry point for the launcher.

use bdd_launcher::cli;
use console::style;
use tracing_subscriber::EnvFilter;

/// Exit code for configuration and validation errors, matching clap's usage errors.
const SETUP_ERROR_EXIT_CODE: i32 = 2;

fn main() {
    // Initialize tracing with WARN level by default, respecting RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli::run() {
        Ok(status) => std::process::exit(status.exit_code()),
        Err(e) => {
            eprintln!("{} {e}", style("Error:").red().bold());
            let code = if e.is_fatal_setup_error() {
                SETUP_ERROR_EXIT_CODE
            } else {
                1
            };
            std::process::exit(code);
        }
    }
}
