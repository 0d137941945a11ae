use crate::{MediaHandle, MediaKind, MediaStore, StoreError};

use std::{panic::Location, sync::Mutex};

use async_trait::async_trait;
use error_location::ErrorLocation;
use tracing::{debug, error, instrument};

/// In-process media store. Most recent means last saved.
#[derive(Debug)]
pub struct MemoryMediaStore {
    assets: Mutex<Vec<(String, MediaHandle)>>,
    access_granted: bool,
}

impl MemoryMediaStore {
    /// Empty store that grants access.
    pub fn new() -> Self {
        Self {
            assets: Mutex::new(Vec::new()),
            access_granted: true,
        }
    }

    /// Store pre-filled with `handles`, saved in order into `album`.
    pub fn with_assets<I>(album: &str, handles: I) -> Self
    where
        I: IntoIterator<Item = MediaHandle>,
    {
        let assets = handles
            .into_iter()
            .map(|handle| (album.to_string(), handle))
            .collect();
        Self {
            assets: Mutex::new(assets),
            access_granted: true,
        }
    }

    /// Make the store refuse media library access.
    pub fn deny_access(mut self) -> Self {
        self.access_granted = false;
        self
    }

    /// Handles saved into `album`, oldest first.
    pub fn album(&self, album: &str) -> Vec<MediaHandle> {
        self.lock()
            .iter()
            .filter(|(name, _)| name == album)
            .map(|(_, handle)| handle.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, MediaHandle)>> {
        self.assets.lock().unwrap_or_else(|e| {
            error!("Media store lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }
}

impl Default for MemoryMediaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn request_access(&self) -> Result<bool, StoreError> {
        Ok(self.access_granted)
    }

    #[instrument(skip(self))]
    async fn save(&self, handle: &MediaHandle, album: &str) -> Result<MediaHandle, StoreError> {
        if !self.access_granted {
            return Err(StoreError::AccessDenied {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.lock().push((album.to_string(), handle.clone()));
        debug!(handle = %handle, album, "Clip stored in memory");

        Ok(handle.clone())
    }

    async fn query_most_recent(&self, _kind: MediaKind) -> Result<Option<MediaHandle>, StoreError> {
        Ok(self.lock().last().map(|(_, handle)| handle.clone()))
    }
}
