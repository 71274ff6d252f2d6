use payloads::{ApiVersion, ClientError, TenorClient, TenorConfig};
use reqwest::StatusCode;
use test_helpers::{Failure, spawn_upstream, unreachable_base_url};

#[tokio::test]
async fn rate_limit_has_its_own_message() -> anyhow::Result<()> {
    let upstream = spawn_upstream().await;
    upstream.fail_next(Failure::Status(429));

    let result = upstream.client(ApiVersion::V2).search("cats", 8, None).await;

    let error = result.unwrap_err();
    assert!(matches!(error, ClientError::RateLimited));
    assert_eq!(
        error.to_string(),
        "Rate limit exceeded. Please try again later."
    );
    assert_eq!(error.status(), Some(StatusCode::TOO_MANY_REQUESTS));

    Ok(())
}

#[tokio::test]
async fn server_errors_carry_the_status() -> anyhow::Result<()> {
    let upstream = spawn_upstream().await;
    upstream.fail_next(Failure::Status(503));

    let error = upstream
        .client(ApiVersion::V1)
        .featured(8)
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert_eq!(error.to_string(), "HTTP error! status: 503");

    // The failure was consumed; the next request succeeds.
    upstream.client(ApiVersion::V1).featured(8).await?;

    Ok(())
}

#[tokio::test]
async fn wrong_key_is_unauthorized() -> anyhow::Result<()> {
    let upstream = spawn_upstream().await;
    let config = TenorConfig::new("not-the-key", ApiVersion::V2)?
        .with_base_url(upstream.base_url(ApiVersion::V2));

    let error = TenorClient::new(config)
        .search("cats", 8, None)
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(StatusCode::UNAUTHORIZED));

    Ok(())
}

#[tokio::test]
async fn embedded_error_is_surfaced_in_the_page() -> anyhow::Result<()> {
    let upstream = spawn_upstream().await;

    for version in [ApiVersion::V1, ApiVersion::V2] {
        upstream.fail_next(Failure::Embedded("quota exhausted".into()));
        let page = upstream.client(version).search("cats", 8, None).await?;

        assert!(page.items.is_empty());
        assert_eq!(page.error.as_deref(), Some("quota exhausted"));
        assert!(!page.has_more());
    }

    Ok(())
}

#[tokio::test]
async fn unreachable_upstream_is_a_network_error() -> anyhow::Result<()> {
    let config = TenorConfig::new("any-key", ApiVersion::V2)?
        .with_base_url(unreachable_base_url(ApiVersion::V2));

    let error = TenorClient::new(config)
        .search("cats", 8, None)
        .await
        .unwrap_err();

    assert!(matches!(error, ClientError::Network(_)));
    assert_eq!(
        error.to_string(),
        "Network error. Please check your connection."
    );
    assert_eq!(error.status(), None);

    Ok(())
}
