use payloads::{ApiVersion, Cursor};
use test_helpers::spawn_upstream;

#[tokio::test]
async fn cursor_is_passed_back_verbatim() -> anyhow::Result<()> {
    let upstream = spawn_upstream().await;
    let client = upstream.client(ApiVersion::V2);

    let first = client.search("dogs", 8, None).await?;
    let cursor = first.next_cursor.clone().expect("more pages");
    assert_eq!(cursor, Cursor::from("8"));

    let second = client.search("dogs", 8, Some(&cursor)).await?;
    assert_eq!(second.items[0].id, "dogs-8");
    assert_eq!(upstream.last_request().unwrap().param("pos"), Some("8"));

    Ok(())
}

#[tokio::test]
async fn last_page_has_no_cursor() -> anyhow::Result<()> {
    let upstream = spawn_upstream().await;
    let client = upstream.client(ApiVersion::V1);

    let page = client
        .search("owls", 8, Some(&Cursor::from("16")))
        .await?;

    assert_eq!(page.items.len(), 4);
    assert_eq!(page.next_cursor, None);
    assert!(!page.has_more());

    Ok(())
}

#[tokio::test]
async fn first_page_sends_no_position() -> anyhow::Result<()> {
    let upstream = spawn_upstream().await;

    upstream
        .client(ApiVersion::V2)
        .search("otters", 5, None)
        .await?;

    let request = upstream.last_request().unwrap();
    assert_eq!(request.path, "/v2/search");
    assert_eq!(request.param("q"), Some("otters"));
    assert_eq!(request.param("limit"), Some("5"));
    assert_eq!(request.param("pos"), None);

    Ok(())
}

#[tokio::test]
async fn version_specific_parameters() -> anyhow::Result<()> {
    let upstream = spawn_upstream().await;

    upstream
        .client(ApiVersion::V1)
        .search("frogs", 8, None)
        .await?;
    let v1 = upstream.last_request().unwrap();
    assert_eq!(v1.path, "/v1/search");
    assert_eq!(v1.param("client_key"), None);
    assert_eq!(v1.param("country"), None);
    assert_eq!(v1.param("contentfilter"), Some("high"));

    upstream
        .client(ApiVersion::V2)
        .search("frogs", 8, None)
        .await?;
    let v2 = upstream.last_request().unwrap();
    assert_eq!(v2.param("client_key"), Some("gif-wall"));
    assert_eq!(v2.param("country"), Some("US"));

    Ok(())
}
