use std::net::TcpListener;
use std::sync::Arc;

use reqwest::header::{ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue, ORIGIN};
use reqwest::{Method, StatusCode};
use test_helpers::{MockState, TEST_API_KEY, build_upstream, spawn_upstream};

const UI_ORIGIN: &str = "http://127.0.0.1:8080";

fn search_url(port: u16) -> String {
    format!(
        "http://127.0.0.1:{port}/v2/search?q=cats&key={TEST_API_KEY}\
         &client_key=gif-wall&country=US"
    )
}

#[tokio::test]
async fn cross_origin_search_is_allowed() -> anyhow::Result<()> {
    let upstream = spawn_upstream().await;

    let response = reqwest::Client::new()
        .get(search_url(upstream.port))
        .header(ORIGIN, UI_ORIGIN)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static(UI_ORIGIN))
    );
    Ok(())
}

#[tokio::test]
async fn preflight_is_answered() -> anyhow::Result<()> {
    let upstream = spawn_upstream().await;

    let response = reqwest::Client::new()
        .request(Method::OPTIONS, search_url(upstream.port))
        .header(ORIGIN, UI_ORIGIN)
        .header("Access-Control-Request-Method", "GET")
        .send()
        .await?;

    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static(UI_ORIGIN))
    );
    // Preflights never reach the catalog.
    assert!(upstream.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn only_listed_origins_are_allowed() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    let server = build_upstream(
        listener,
        Arc::new(MockState::new(4)),
        vec![UI_ORIGIN.to_string()],
    )?;
    tokio::spawn(server);

    let client = reqwest::Client::new();
    let allowed = client
        .get(search_url(port))
        .header(ORIGIN, UI_ORIGIN)
        .send()
        .await?;
    assert_eq!(
        allowed.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static(UI_ORIGIN))
    );

    let other = client
        .get(search_url(port))
        .header(ORIGIN, "http://elsewhere.example")
        .send()
        .await?;
    assert!(!other.status().is_success());
    assert!(other.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    Ok(())
}
