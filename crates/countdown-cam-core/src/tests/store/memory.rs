use crate::{MediaHandle, MediaKind, MediaStore, MemoryMediaStore, StoreError};

/// WHAT: An empty store has no most recent video
/// WHY: Discovery must be able to report "no recent video"
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_empty_store_when_querying_then_none() {
    // Given: An empty store
    let store = MemoryMediaStore::new();

    // When: Querying the newest video
    let newest = store.query_most_recent(MediaKind::Video).await.unwrap();

    // Then: Nothing
    assert_eq!(newest, None);
}

/// WHAT: The last saved clip is the most recent
/// WHY: Insertion order stands in for creation time
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_saved_clips_when_querying_then_last_saved_returned() {
    // Given: Two clips saved into different albums
    let store = MemoryMediaStore::new();
    store.save(&MediaHandle::new("a.mp4"), "One").await.unwrap();
    store.save(&MediaHandle::new("b.mp4"), "Two").await.unwrap();

    // When: Querying the newest video
    let newest = store.query_most_recent(MediaKind::Video).await.unwrap();

    // Then: The later one, and albums are kept apart
    assert_eq!(newest, Some(MediaHandle::new("b.mp4")));
    assert_eq!(store.album("One"), vec![MediaHandle::new("a.mp4")]);
}

/// WHAT: A store without access refuses to save
/// WHY: Saving requires media library permission
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_denied_access_when_saving_then_access_denied() {
    // Given: A store that refuses access
    let store = MemoryMediaStore::new().deny_access();

    // When: Saving
    let result = store.save(&MediaHandle::new("a.mp4"), "One").await;

    // Then: Refused and nothing stored
    assert!(!store.request_access().await.unwrap());
    assert!(matches!(result, Err(StoreError::AccessDenied { .. })));
    assert!(store.album("One").is_empty());
}
