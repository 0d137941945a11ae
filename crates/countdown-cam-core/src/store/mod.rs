//! Media store abstraction and implementations.
//!
//! The controller only sees [`MediaStore`]. Which implementation, and which
//! "most recent" lookup it uses, is decided when the application is composed.

mod directory;
mod memory;

pub use {
    directory::{DirectoryMediaStore, RecencyStrategy},
    memory::MemoryMediaStore,
};

use crate::{MediaHandle, MediaKind, StoreError};

use async_trait::async_trait;

/// Album name used when none is configured.
pub const DEFAULT_ALBUM: &str = "Expo Videos";

/// Platform media library able to persist clips and find the newest one.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Ask for media library access. Returns whether it was granted.
    async fn request_access(&self) -> Result<bool, StoreError> {
        Ok(true)
    }

    /// Persist a captured clip into `album` and return where it was stored.
    async fn save(&self, handle: &MediaHandle, album: &str) -> Result<MediaHandle, StoreError>;

    /// Newest stored asset of `kind`, if any.
    async fn query_most_recent(&self, kind: MediaKind) -> Result<Option<MediaHandle>, StoreError>;
}
