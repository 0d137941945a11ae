//! Countdown-cam Core Library
//!
//! Recording session lifecycle for a countdown camera: permission, a
//! countdown that gates every recording, stop-and-save, camera facing and
//! playback of the most recent clip. Camera and media library are external
//! collaborators behind [`CaptureDevice`] and [`MediaStore`].
//!
//! # Example
//!
//! ```no_run
//! use countdown_cam_core::{
//!     CaptureDevice, ControllerSettings, CoreResult, MemoryMediaStore, SessionController,
//! };
//!
//! use std::sync::Arc;
//!
//! async fn record(camera: Arc<dyn CaptureDevice>) -> CoreResult<()> {
//!     let store = Arc::new(MemoryMediaStore::new());
//!     let mut controller = SessionController::new(camera, store, ControllerSettings::default());
//!
//!     controller.request_permission().await?;
//!     controller.begin_countdown()?;
//!     for _ in 0..5 {
//!         controller.tick().await?;
//!     }
//!     let clip = controller.stop_capture().await?;
//!
//!     println!("Saved: {}", clip);
//!     Ok(())
//! }
//! ```

mod device;
mod error;
mod session;
mod store;

pub use {
    device::CaptureDevice,
    error::{CaptureError, Result as CoreResult, SessionError, SessionNotice, StoreError},
    session::{
        CameraFacing, ControllerSettings, CountdownTimer, DEFAULT_COUNTDOWN_SECONDS,
        INTENT_CHANNEL_CAPACITY, MediaHandle, MediaKind, PendingStop, PermissionStatus, Phase,
        SessionController, SessionHandle, SessionIntent, SessionRunner, SessionSnapshot,
        SessionState, StopOutcome, TickOutcome,
    },
    store::{DEFAULT_ALBUM, DirectoryMediaStore, MediaStore, MemoryMediaStore, RecencyStrategy},
};
