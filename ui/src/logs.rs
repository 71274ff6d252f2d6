//! Logging to the browser console.

use tracing_subscriber::{EnvFilter, prelude::*};
use tracing_web::MakeWebConsoleWriter;

const DEFAULT_FILTER: &str = "error,ui=debug,feed=debug,payloads=info";

/// Directives baked in with `UI_LOG=... trunk build`, else the default.
fn log_filter() -> EnvFilter {
    option_env!("UI_LOG")
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the console subscriber. Call once, before rendering.
pub fn init_logging() {
    // No ANSI (browser support is partial), no timestamps (std::time is
    // unavailable), and the console already shows the level.
    let console = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_line_number(true)
        .with_level(false)
        .with_target(true)
        .with_writer(MakeWebConsoleWriter::new().with_pretty_level());

    let result = tracing_subscriber::registry()
        .with(log_filter())
        .with(console)
        .try_init();

    match result {
        Ok(()) => tracing::info!("Console logging ready"),
        Err(e) => tracing::warn!("Logging already initialized: {e}"),
    }
}
