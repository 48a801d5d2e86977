pub mod clients;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod form;
pub mod orchestrator;
pub mod render;
pub mod schemas;
pub mod sessions;

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. Stdout is reserved for the result view.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
