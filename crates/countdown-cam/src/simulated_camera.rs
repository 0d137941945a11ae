//! Stand-in capture device for running without camera hardware.
//!
//! Writes a small placeholder `.mp4` per recording into a scratch
//! directory. File names carry the stop time in unix milliseconds so they
//! sort chronologically.

use std::{
    panic::Location,
    path::PathBuf,
    sync::{Mutex, MutexGuard},
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use countdown_cam_core::{CameraFacing, CaptureDevice, CaptureError, MediaHandle};
use error_location::ErrorLocation;
use tokio::fs;
use tracing::{debug, error, info, instrument};

#[derive(Debug, Clone, Copy)]
struct ActiveRecording {
    facing: CameraFacing,
    started_at: Instant,
}

/// Capture device that fakes recordings on disk.
pub struct SimulatedCamera {
    scratch_dir: PathBuf,
    grant_permission: bool,
    active: Mutex<Option<ActiveRecording>>,
}

impl SimulatedCamera {
    /// Camera writing into `scratch_dir` and answering permission requests
    /// with `grant_permission`.
    pub fn new(scratch_dir: PathBuf, grant_permission: bool) -> Self {
        Self {
            scratch_dir,
            grant_permission,
            active: Mutex::new(None),
        }
    }

    fn active(&self) -> MutexGuard<'_, Option<ActiveRecording>> {
        self.active.lock().unwrap_or_else(|e| {
            error!("Camera state lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }
}

#[track_caller]
fn unavailable(reason: String) -> CaptureError {
    CaptureError::Unavailable {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}

#[async_trait]
impl CaptureDevice for SimulatedCamera {
    async fn request_authorization(&self) -> Result<bool, CaptureError> {
        debug!(granted = self.grant_permission, "Simulated permission prompt");
        Ok(self.grant_permission)
    }

    #[instrument(skip(self))]
    async fn start_recording(&self, facing: CameraFacing) -> Result<(), CaptureError> {
        fs::create_dir_all(&self.scratch_dir)
            .await
            .map_err(|e| unavailable(format!("Failed to create scratch dir: {}", e)))?;

        let mut active = self.active();
        if active.is_some() {
            return Err(CaptureError::Busy {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        *active = Some(ActiveRecording {
            facing,
            started_at: Instant::now(),
        });

        info!(facing = %facing, "Simulated recording started");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn stop_recording(&self) -> Result<MediaHandle, CaptureError> {
        let recording = self
            .active()
            .take()
            .ok_or_else(|| CaptureError::NoActiveRecording {
                location: ErrorLocation::from(Location::caller()),
            })?;

        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| unavailable(format!("System clock before unix epoch: {}", e)))?
            .as_millis();
        let path = self.scratch_dir.join(format!("clip-{}.mp4", stamp));
        let duration_ms = recording.started_at.elapsed().as_millis();

        let placeholder = format!(
            "simulated {} camera clip, {} ms\n",
            recording.facing, duration_ms
        );
        fs::write(&path, placeholder)
            .await
            .map_err(|e| unavailable(format!("Failed to write clip: {}", e)))?;

        info!(path = ?path, duration_ms, "Simulated recording stopped");

        Ok(MediaHandle::new(path.to_string_lossy()))
    }
}
