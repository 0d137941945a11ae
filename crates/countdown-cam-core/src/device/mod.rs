//! Capture device abstraction.
//!
//! Wraps the platform camera: authorization, record start, record stop.

use crate::{CameraFacing, CaptureError, MediaHandle};

use async_trait::async_trait;

/// Platform camera able to record one video at a time.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Ask the user for camera access. Returns whether it was granted.
    async fn request_authorization(&self) -> Result<bool, CaptureError>;

    /// Begin recording with the given camera.
    ///
    /// Fails with [`CaptureError::Busy`] if a recording is already running.
    async fn start_recording(&self, facing: CameraFacing) -> Result<(), CaptureError>;

    /// Finish the running recording and hand back the produced clip.
    ///
    /// Fails with [`CaptureError::NoActiveRecording`] if nothing is recording.
    async fn stop_recording(&self) -> Result<MediaHandle, CaptureError>;
}
