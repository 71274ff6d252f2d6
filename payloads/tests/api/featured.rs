use payloads::ApiVersion;
use test_helpers::spawn_upstream;

#[tokio::test]
async fn v1_uses_trending() -> anyhow::Result<()> {
    let upstream = spawn_upstream().await;

    let page = upstream.client(ApiVersion::V1).featured(6).await?;

    assert_eq!(page.items.len(), 6);
    assert_eq!(page.items[0].id, "featured-0");
    assert_eq!(upstream.last_request().unwrap().path, "/v1/trending");

    Ok(())
}

#[tokio::test]
async fn v2_uses_featured() -> anyhow::Result<()> {
    let upstream = spawn_upstream().await;

    let page = upstream.client(ApiVersion::V2).featured(6).await?;

    assert_eq!(page.items.len(), 6);
    assert!(page.has_more());
    let request = upstream.last_request().unwrap();
    assert_eq!(request.path, "/v2/featured");
    assert_eq!(request.param("q"), None);

    Ok(())
}
