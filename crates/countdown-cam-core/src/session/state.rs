use crate::SessionNotice;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Countdown length used when no other value is configured.
pub const DEFAULT_COUNTDOWN_SECONDS: u32 = 5;

/// Top-level lifecycle state of a recording session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing is happening.
    #[default]
    Idle,
    /// Counting down before recording starts.
    CountingDown,
    /// The capture device is recording.
    Recording,
}

/// Which camera the capture device should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraFacing {
    /// Selfie camera.
    Front,
    /// Rear camera.
    #[default]
    Back,
}

impl CameraFacing {
    /// The other camera.
    pub fn flipped(self) -> Self {
        match self {
            CameraFacing::Front => CameraFacing::Back,
            CameraFacing::Back => CameraFacing::Front,
        }
    }
}

impl fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraFacing::Front => f.write_str("front"),
            CameraFacing::Back => f.write_str("back"),
        }
    }
}

/// Camera permission, unknown until the first request resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    /// Not asked yet.
    #[default]
    Unknown,
    /// The user allowed camera access.
    Granted,
    /// The user refused camera access.
    Denied,
}

/// Opaque reference (URI or path) to a stored video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaHandle(String);

impl MediaHandle {
    /// Wrap a URI or path.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// The wrapped URI or path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaHandle {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

/// Kind of media asked for when querying a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Video clips.
    Video,
}

/// The single mutable record owned by the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Current lifecycle phase.
    pub phase: Phase,
    /// Seconds left before recording; 0 while recording.
    pub countdown_remaining: u32,
    /// Selected camera.
    pub camera_facing: CameraFacing,
    /// Camera permission.
    pub permission: PermissionStatus,
    /// Most recently captured or discovered video.
    pub last_media: Option<MediaHandle>,
    /// Whether `last_media` is playing.
    pub is_playing: bool,
}

impl SessionState {
    /// Fresh state with the given countdown length and camera.
    pub fn new(countdown_seconds: u32, camera_facing: CameraFacing) -> Self {
        Self {
            phase: Phase::Idle,
            countdown_remaining: countdown_seconds,
            camera_facing,
            permission: PermissionStatus::Unknown,
            last_media: None,
            is_playing: false,
        }
    }

    /// True once camera permission has been granted.
    pub fn has_capture_permission(&self) -> bool {
        self.permission == PermissionStatus::Granted
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECONDS, CameraFacing::default())
    }
}

/// Read-only view of the session handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Current lifecycle phase.
    pub phase: Phase,
    /// Seconds left before recording.
    pub countdown_remaining: u32,
    /// Selected camera.
    pub camera_facing: CameraFacing,
    /// Camera permission.
    pub permission: PermissionStatus,
    /// Most recently captured or discovered video.
    pub last_media: Option<MediaHandle>,
    /// Whether `last_media` is playing.
    pub is_playing: bool,
    /// A stop has been issued and has not resolved yet.
    pub stop_pending: bool,
    /// Last condition reported to the user, cleared by the next successful intent.
    pub notice: Option<SessionNotice>,
}

impl SessionSnapshot {
    pub(crate) fn capture(
        state: &SessionState,
        stop_pending: bool,
        notice: Option<SessionNotice>,
    ) -> Self {
        Self {
            phase: state.phase,
            countdown_remaining: state.countdown_remaining,
            camera_facing: state.camera_facing,
            permission: state.permission,
            last_media: state.last_media.clone(),
            is_playing: state.is_playing,
            stop_pending,
            notice,
        }
    }
}
