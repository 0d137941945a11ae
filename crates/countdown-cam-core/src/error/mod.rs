use std::panic::Location;

use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// Failures reported by a [`CaptureDevice`](crate::CaptureDevice).
#[derive(Error, Debug)]
pub enum CaptureError {
    /// A recording is already running on the device.
    #[error("Capture device busy {location}")]
    Busy {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Stop was requested but nothing is recording.
    #[error("No active recording {location}")]
    NoActiveRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The device could not perform the operation.
    #[error("Capture device unavailable: {reason} {location}")]
    Unavailable {
        /// Description of the device failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Failures reported by a [`MediaStore`](crate::MediaStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// Media library permission was refused.
    #[error("Media library access denied {location}")]
    AccessDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Filesystem operation failed.
    #[error("Media store IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Lookup of stored media failed.
    #[error("Media query failed: {reason} {location}")]
    Query {
        /// Description of the query failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl From<std::io::Error> for StoreError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        StoreError::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Errors surfaced by the session controller.
///
/// Every collaborator failure is converted into one of these at the
/// controller boundary. None of them are fatal to the session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Camera permission is missing or was refused.
    #[error("Camera permission denied {location}")]
    PermissionDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A session is already active, or the intent is not allowed while recording.
    #[error("Device busy: {reason} {location}")]
    DeviceBusy {
        /// Why the intent was rejected.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Stop was requested with no active recording.
    #[error("Capture aborted: {reason} {location}")]
    CaptureAborted {
        /// Why the stop was rejected.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture device failed to start or stop.
    #[error("Capture failed: {source} {location}")]
    CaptureFailed {
        /// The underlying device error.
        #[source]
        source: CaptureError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Persisting a finished capture failed. The clip is still kept in memory.
    #[error("Save failed: {source} {location}")]
    StorageError {
        /// The underlying store error.
        #[source]
        source: StoreError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No recent media could be found, or there is none to play.
    #[error("Not found: {reason} {location}")]
    NotFound {
        /// What was missing.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

// Busy and NoActiveRecording keep their session-level meaning; anything
// else from the device is a generic capture failure.
impl From<CaptureError> for SessionError {
    #[track_caller]
    fn from(source: CaptureError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match source {
            CaptureError::Busy { .. } => SessionError::DeviceBusy {
                reason: "capture device already recording".to_string(),
                location,
            },
            CaptureError::NoActiveRecording { .. } => SessionError::CaptureAborted {
                reason: "capture device has no active recording".to_string(),
                location,
            },
            source @ CaptureError::Unavailable { .. } => {
                SessionError::CaptureFailed { source, location }
            }
        }
    }
}

impl From<StoreError> for SessionError {
    #[track_caller]
    fn from(source: StoreError) -> Self {
        SessionError::StorageError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// User-facing condition derived from the last [`SessionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionNotice {
    /// Camera permission is required.
    PermissionDenied,
    /// A session is already running.
    DeviceBusy,
    /// Nothing was recording.
    CaptureAborted,
    /// The camera failed.
    CaptureFailed,
    /// The clip was recorded but could not be saved.
    SaveFailed,
    /// No recent video exists.
    NoRecentVideo,
}

impl SessionNotice {
    /// Short banner text for the presentation layer.
    pub fn message(self) -> &'static str {
        match self {
            SessionNotice::PermissionDenied => "camera permission is required",
            SessionNotice::DeviceBusy => "a recording session is already active",
            SessionNotice::CaptureAborted => "nothing is recording",
            SessionNotice::CaptureFailed => "the camera failed",
            SessionNotice::SaveFailed => "save failed",
            SessionNotice::NoRecentVideo => "no recent video",
        }
    }
}

impl SessionError {
    /// The user-facing condition for this error.
    pub fn notice(&self) -> SessionNotice {
        match self {
            SessionError::PermissionDenied { .. } => SessionNotice::PermissionDenied,
            SessionError::DeviceBusy { .. } => SessionNotice::DeviceBusy,
            SessionError::CaptureAborted { .. } => SessionNotice::CaptureAborted,
            SessionError::CaptureFailed { .. } => SessionNotice::CaptureFailed,
            SessionError::StorageError { .. } => SessionNotice::SaveFailed,
            SessionError::NotFound { .. } => SessionNotice::NoRecentVideo,
        }
    }
}

/// Result type alias using [`SessionError`].
pub type Result<T> = std::result::Result<T, SessionError>;
