use crate::config::default_album;

use std::path::PathBuf;

use countdown_cam_core::RecencyStrategy;
use serde::{Deserialize, Serialize};

/// Which media store implementation to compose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Albums as directories under `root_dir`.
    #[default]
    Directory,
    /// In-process only; nothing survives a restart.
    Memory,
}

/// Media store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store implementation.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Root directory of the directory store.
    pub root_dir: PathBuf,

    /// Album finished clips are saved into.
    #[serde(default = "default_album")]
    pub album: String,

    /// How the directory store finds the newest video.
    #[serde(default)]
    pub recency: RecencyStrategy,
}
