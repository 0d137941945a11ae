use crate::{MediaHandle, MediaKind, MediaStore, StoreError};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    time::SystemTime,
};

use async_trait::async_trait;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info, instrument};

/// File extensions treated as video.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v", "webm"];

/// How [`DirectoryMediaStore`] decides which video is the newest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecencyStrategy {
    /// Latest filesystem modification time.
    #[default]
    ModifiedTime,
    /// Lexicographically greatest file name. Relies on sortable timestamps in names.
    FileName,
}

/// Media store backed by a directory tree: one sub-directory per album.
#[derive(Debug, Clone)]
pub struct DirectoryMediaStore {
    root: PathBuf,
    recency: RecencyStrategy,
}

struct Candidate {
    path: PathBuf,
    name: String,
    modified: SystemTime,
}

impl DirectoryMediaStore {
    /// Store rooted at `root`. The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>, recency: RecencyStrategy) -> Self {
        Self {
            root: root.into(),
            recency,
        }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn collect_videos(&self, dir: &Path, out: &mut Vec<Candidate>) -> Result<(), StoreError> {
        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            let path = entry.path();

            if !metadata.is_file() || !is_video(&path) {
                continue;
            }

            out.push(Candidate {
                name: entry.file_name().to_string_lossy().into_owned(),
                modified: metadata.modified()?,
                path,
            });
        }
        Ok(())
    }

    fn newest(&self, candidates: Vec<Candidate>) -> Option<Candidate> {
        match self.recency {
            RecencyStrategy::ModifiedTime => candidates
                .into_iter()
                .max_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.name.cmp(&b.name))),
            RecencyStrategy::FileName => candidates.into_iter().max_by(|a, b| a.name.cmp(&b.name)),
        }
    }
}

fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Both paths resolve to the same existing file.
async fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a).await, fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[async_trait]
impl MediaStore for DirectoryMediaStore {
    #[instrument(skip(self))]
    async fn save(&self, handle: &MediaHandle, album: &str) -> Result<MediaHandle, StoreError> {
        let source = Path::new(handle.as_str());
        let file_name = source.file_name().ok_or_else(|| StoreError::Query {
            reason: format!("Media handle has no file name: {}", handle),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let album_dir = self.root.join(album);
        fs::create_dir_all(&album_dir).await?;

        let destination = album_dir.join(file_name);
        let stored = MediaHandle::new(destination.to_string_lossy());

        // Copying a file onto itself truncates it.
        if is_same_file(source, &destination).await {
            info!(destination = ?destination, "Clip already in album");
            return Ok(stored);
        }

        let bytes = fs::copy(source, &destination).await?;

        info!(
            source = ?source,
            destination = ?destination,
            bytes,
            "Clip saved to album"
        );

        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn query_most_recent(&self, kind: MediaKind) -> Result<Option<MediaHandle>, StoreError> {
        if !fs::try_exists(&self.root).await? {
            debug!(root = ?self.root, "Media root does not exist yet");
            return Ok(None);
        }

        let mut candidates = Vec::new();
        self.collect_videos(&self.root, &mut candidates).await?;

        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                self.collect_videos(&entry.path(), &mut candidates).await?;
            }
        }

        debug!(
            kind = ?kind,
            candidates = candidates.len(),
            recency = ?self.recency,
            "Scanned media root"
        );

        Ok(self
            .newest(candidates)
            .map(|newest| MediaHandle::new(newest.path.to_string_lossy())))
    }
}
