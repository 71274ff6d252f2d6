//! Tracing setup shared by the dev server and the integration tests.

use std::sync::Once;

use tracing::Subscriber;
use tracing::subscriber::set_global_default;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

/// Quiet dependencies, our own crates at `level`.
pub fn default_filter(level: &str) -> String {
    format!(
        "warn,payloads={level},feed={level},test_helpers={level},\
         dev_server={level}"
    )
}

/// `RUST_LOG` wins over `env_filter` when set.
pub fn get_subscriber(env_filter: String) -> impl Subscriber + Sync + Send {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env_filter));
    let stderr = fmt::Layer::new()
        .with_writer(std::io::stderr)
        .pretty()
        .with_span_events(fmt::format::FmtSpan::CLOSE);
    Registry::default().with(env_filter).with(stderr)
}

/// Install `subscriber` for the whole process and route `log` records into
/// it. Fails if a global subscriber is already set.
pub fn init_subscriber(
    subscriber: impl Subscriber + Sync + Send,
) -> anyhow::Result<()> {
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}

/// Idempotent variant for tests, which all race to initialize.
pub fn init_test_subscriber() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = LogTracer::init();
        let _ = get_subscriber(default_filter("error")).try_init();
    });
}
