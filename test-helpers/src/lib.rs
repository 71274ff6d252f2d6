pub mod mock;
pub mod telemetry;

use std::net::TcpListener;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use payloads::{ApiVersion, TenorClient, TenorConfig};

pub use mock::{Failure, MockState, RecordedRequest, RequestLog, TEST_API_KEY};

/// Results per query in the default catalog.
pub const DEFAULT_CATALOG_SIZE: usize = 20;

pub struct TestUpstream {
    pub port: u16,
    pub state: Arc<MockState>,
}

impl TestUpstream {
    /// Base URL for `version`, as `TENOR_API_BASE_URL` would hold it.
    pub fn base_url(&self, version: ApiVersion) -> String {
        format!("http://127.0.0.1:{}/{version}", self.port)
    }

    pub fn config(&self, version: ApiVersion) -> TenorConfig {
        TenorConfig::new(TEST_API_KEY, version)
            .expect("test key is valid")
            .with_base_url(self.base_url(version))
    }

    /// A client pointed at this mock, speaking `version`.
    pub fn client(&self, version: ApiVersion) -> TenorClient {
        TenorClient::new(self.config(version))
    }

    /// Serve `failure` instead of the next catalog page.
    pub fn fail_next(&self, failure: Failure) {
        self.state
            .failures
            .lock()
            .expect("failure queue poisoned")
            .push_back(failure);
    }

    /// Requests received so far, oldest first, up to
    /// [`RequestLog::CAPACITY`].
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .expect("request log poisoned")
            .recent()
            .cloned()
            .collect()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests().pop()
    }
}

/// Build the mock server on an already bound listener without starting it.
///
/// The UI calls the mock from another origin, so responses carry CORS
/// headers: for `allowed_origins`, or for any origin when it is empty.
pub fn build_upstream(
    listener: TcpListener,
    state: Arc<MockState>,
    allowed_origins: Vec<String>,
) -> std::io::Result<Server> {
    let data = web::Data::from(state);
    let server = HttpServer::new(move || {
        let cors = if allowed_origins.is_empty() {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(["GET"])
                .allow_any_header()
        } else {
            let mut cors = Cors::default()
                .allowed_methods(["GET"])
                .allow_any_header();
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            cors
        };

        App::new()
            .app_data(data.clone())
            .wrap(cors)
            .wrap(actix_web::middleware::Logger::default())
            .configure(mock::configure)
    })
    .listen(listener)?
    .workers(1)
    .run();
    Ok(server)
}

pub async fn spawn_upstream_on_port(port: u16) -> anyhow::Result<TestUpstream> {
    telemetry::init_test_subscriber();

    let listener = TcpListener::bind(("127.0.0.1", port))?;
    let port = listener.local_addr()?.port();
    let state = Arc::new(MockState::new(DEFAULT_CATALOG_SIZE));

    let server = build_upstream(listener, state.clone(), Vec::new())?;
    tokio::spawn(server);
    tracing::debug!(port, "Mock upstream listening");

    Ok(TestUpstream { port, state })
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_upstream() -> TestUpstream {
    spawn_upstream_on_port(0)
        .await
        .expect("failed to start mock upstream")
}

/// A base URL nothing is listening on, for exercising transport failures.
pub fn unreachable_base_url(version: ApiVersion) -> String {
    let port = TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .map(|addr| addr.port())
        .expect("failed to reserve a port");
    format!("http://127.0.0.1:{port}/{version}")
}
