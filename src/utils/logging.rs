//! Logging
//!
//! `tracing-subscriber` setup for the binary. Logs go to stderr so stdout
//! stays free for run progress.

use tracing_subscriber::EnvFilter;

use super::error::{AppError, AppResult};

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "docsmith=debug,docsmith_llm=debug,docsmith_tools=debug"
    } else {
        "docsmith=info"
    }
}

/// Install the global subscriber. `LOG_FORMAT=json` selects JSON lines.
pub fn init_tracing(verbose: bool) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let result = match format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .try_init(),
        _ => tracing_subscriber::fmt()
            .compact()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    result.map_err(|e| AppError::internal(format!("tracing init failed: {e}")))
}
