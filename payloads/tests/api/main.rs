mod errors;
mod featured;
mod search;

use payloads::ApiVersion;
use test_helpers::spawn_upstream;

#[tokio::test]
async fn both_versions_normalize_to_the_same_gifs() -> anyhow::Result<()> {
    let upstream = spawn_upstream().await;

    let v1 = upstream.client(ApiVersion::V1).search("cats", 4, None).await?;
    let v2 = upstream.client(ApiVersion::V2).search("cats", 4, None).await?;

    assert_eq!(v1.items.len(), 4);
    assert_eq!(v1.items, v2.items);
    assert_eq!(v1.next_cursor, v2.next_cursor);

    let first = &v1.items[0];
    assert_eq!(first.id, "cats-0");
    assert_eq!(first.title, "Mock GIF 0 for cats");
    assert!(first.full_url.ends_with("/cats-0.gif"));
    assert!(first.preview_url.ends_with("/cats-0-preview.gif"));
    assert_eq!((first.width, first.height), (480, 270));
    assert_eq!(first.created_at.as_second(), 1_736_676_000);

    Ok(())
}
