//! Development server for GIF wall UI development
//!
//! Runs the mock upstream GIF service on a fixed port so the UI can be
//! developed without a real API key. Both schema versions are served, under
//! `/v1` and `/v2`.
//!
//! Usage: cargo run -p dev-server
//!
//! Environment (also read from `.env`):
//! - DEV_UPSTREAM_PORT: port to listen on (default 8787)
//! - DEV_CATALOG_SIZE: results per query (default 60)
//! - DEV_ALLOWED_ORIGINS: comma-separated origins allowed by CORS (default
//!   any origin)

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use payloads::ApiVersion;
use test_helpers::{MockState, TEST_API_KEY, telemetry};
use tokio::time::interval;
use tracing::info;

const DEFAULT_PORT: u16 = 8787;
const DEFAULT_CATALOG_SIZE: usize = 60;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = telemetry::get_subscriber(telemetry::default_filter("info"));
    telemetry::init_subscriber(subscriber)?;

    let port = env_or("DEV_UPSTREAM_PORT", DEFAULT_PORT)?;
    let catalog_size = env_or("DEV_CATALOG_SIZE", DEFAULT_CATALOG_SIZE)?;
    let allowed_origins = allowed_origins();

    info!("🚀 Starting GIF wall development server");

    let listener = TcpListener::bind(("127.0.0.1", port))
        .with_context(|| format!("failed to bind port {port}"))?;
    let state = Arc::new(MockState::new(catalog_size));
    let server = test_helpers::build_upstream(
        listener,
        state.clone(),
        allowed_origins.clone(),
    )?;
    let handle = tokio::spawn(server);

    info!("✅ Mock upstream running on http://127.0.0.1:{port}");
    info!("📊 {catalog_size} results per query");
    if allowed_origins.is_empty() {
        info!("🌐 CORS: any origin");
    } else {
        info!("🌐 CORS: {}", allowed_origins.join(", "));
    }
    start_request_report_task(state);

    info!("🎯 Development server ready!");
    for version in [ApiVersion::V2, ApiVersion::V1] {
        info!(
            "   UI ({version}): cd ui && TENOR_API_KEY={TEST_API_KEY} \
             TENOR_API_VERSION={version} \
             TENOR_API_BASE_URL=http://127.0.0.1:{port}/{version} trunk serve"
        );
    }
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    tokio::select! {
        result = tokio::signal::ctrl_c() => result?,
        result = handle => result??,
    }
    info!("🛑 Shutting down development server");
    Ok(())
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("invalid {key}: {value:?}")),
        Err(_) => Ok(default),
    }
}

fn allowed_origins() -> Vec<String> {
    std::env::var("DEV_ALLOWED_ORIGINS")
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Periodically logs how many requests the mock has served.
fn start_request_report_task(state: Arc<MockState>) {
    tokio::spawn(async move {
        let mut interval = interval(Duration::from_secs(30));
        let mut reported = 0;

        loop {
            interval.tick().await;
            let served = {
                let Ok(log) = state.requests.lock() else {
                    return;
                };
                for request in log.since(reported) {
                    tracing::debug!(
                        path = %request.path,
                        q = request.param("q"),
                        pos = request.param("pos"),
                        "📨 Served request"
                    );
                }
                log.served()
            };
            if served == reported {
                continue;
            }
            info!("📨 {served} requests served");
            reported = served;
        }
    });
}
