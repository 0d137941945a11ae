use crate::{DirectoryMediaStore, MediaHandle, MediaKind, MediaStore, RecencyStrategy};

use std::{
    fs,
    path::Path,
    time::{Duration, SystemTime},
};

fn write_clip(path: &Path, modified: SystemTime) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, b"clip")?;
    fs::File::options()
        .write(true)
        .open(path)?
        .set_modified(modified)
}

/// WHAT: A missing root means no videos
/// WHY: First launch has no media directory yet
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_missing_root_when_querying_then_none() {
    // Given: A store rooted at a directory that does not exist
    let temp = tempfile::tempdir().unwrap();
    let store = DirectoryMediaStore::new(temp.path().join("media"), RecencyStrategy::ModifiedTime);

    // When: Querying
    let newest = store.query_most_recent(MediaKind::Video).await.unwrap();

    // Then: Nothing
    assert_eq!(newest, None);
}

/// WHAT: Saving copies the clip into the album directory
/// WHY: Albums are sub-directories of the store root
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_captured_file_when_saving_then_copied_into_album() {
    // Given: A captured clip outside the store
    let temp = tempfile::tempdir().unwrap();
    let captured = temp.path().join("scratch").join("clip-1.mp4");
    write_clip(&captured, SystemTime::now()).unwrap();
    let store = DirectoryMediaStore::new(temp.path().join("media"), RecencyStrategy::ModifiedTime);

    // When: Saving into an album
    let saved = store
        .save(&MediaHandle::new(captured.to_string_lossy()), "Expo Videos")
        .await
        .unwrap();

    // Then: The album holds a copy, reported by save and found as newest
    let stored = temp.path().join("media").join("Expo Videos").join("clip-1.mp4");
    assert_eq!(saved, MediaHandle::new(stored.to_string_lossy()));
    assert_eq!(fs::read(&stored).unwrap(), b"clip");
    let newest = store.query_most_recent(MediaKind::Video).await.unwrap();
    assert_eq!(newest, Some(MediaHandle::new(stored.to_string_lossy())));
}

/// WHAT: Modified-time strategy picks the latest mtime across albums
/// WHY: Platforms that sort by creation date see the last recorded clip
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_clips_in_albums_when_querying_by_mtime_then_latest_mtime_wins() {
    // Given: An older clip with a later name and a newer clip in another album
    let temp = tempfile::tempdir().unwrap();
    let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let older = temp.path().join("A").join("zzz.mp4");
    let newer = temp.path().join("B").join("aaa.mov");
    write_clip(&older, base).unwrap();
    write_clip(&newer, base + Duration::from_secs(60)).unwrap();
    let store = DirectoryMediaStore::new(temp.path(), RecencyStrategy::ModifiedTime);

    // When: Querying
    let newest = store.query_most_recent(MediaKind::Video).await.unwrap();

    // Then: The clip with the later modification time
    assert_eq!(newest, Some(MediaHandle::new(newer.to_string_lossy())));
}

/// WHAT: File-name strategy picks the greatest name regardless of mtime
/// WHY: Platforms that index by timestamped name use a different lookup
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_clips_when_querying_by_name_then_greatest_name_wins() {
    // Given: A later-named clip with an older modification time
    let temp = tempfile::tempdir().unwrap();
    let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let later_name = temp.path().join("A").join("clip-1700000002000.mp4");
    let earlier_name = temp.path().join("A").join("clip-1700000001000.mp4");
    write_clip(&later_name, base).unwrap();
    write_clip(&earlier_name, base + Duration::from_secs(60)).unwrap();
    let store = DirectoryMediaStore::new(temp.path(), RecencyStrategy::FileName);

    // When: Querying
    let newest = store.query_most_recent(MediaKind::Video).await.unwrap();

    // Then: The greatest name
    assert_eq!(newest, Some(MediaHandle::new(later_name.to_string_lossy())));
}

/// WHAT: Non-video files are never returned
/// WHY: Albums may contain photos or sidecar files
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_only_non_video_files_when_querying_then_none() {
    // Given: A photo and a text file
    let temp = tempfile::tempdir().unwrap();
    write_clip(&temp.path().join("A").join("photo.jpg"), SystemTime::now()).unwrap();
    write_clip(&temp.path().join("notes.txt"), SystemTime::now()).unwrap();
    let store = DirectoryMediaStore::new(temp.path(), RecencyStrategy::ModifiedTime);

    // When: Querying
    let newest = store.query_most_recent(MediaKind::Video).await.unwrap();

    // Then: Nothing
    assert_eq!(newest, None);
}

/// WHAT: Saving a clip that already sits in the album keeps its contents
/// WHY: Copying a file onto itself truncates it and the clip would be lost
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_clip_already_in_album_when_saving_then_contents_intact() {
    // Given: A capture written straight into the album directory
    let temp = tempfile::tempdir().unwrap();
    let in_album = temp.path().join("Expo Videos").join("clip-1.mp4");
    fs::create_dir_all(in_album.parent().unwrap()).unwrap();
    fs::write(&in_album, b"video bytes").unwrap();
    let store = DirectoryMediaStore::new(temp.path(), RecencyStrategy::ModifiedTime);
    let handle = MediaHandle::new(in_album.to_string_lossy());

    // When: Saving it into that same album
    let saved = store.save(&handle, "Expo Videos").await.unwrap();

    // Then: Same location and the bytes are untouched
    assert_eq!(saved, handle);
    assert_eq!(fs::read(&in_album).unwrap(), b"video bytes");
}
