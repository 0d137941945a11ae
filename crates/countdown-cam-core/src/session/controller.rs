use crate::{
    CameraFacing, CaptureDevice, CaptureError, CoreResult, MediaHandle, MediaKind, MediaStore,
    PermissionStatus, Phase, SessionError, SessionNotice, StoreError,
    session::{
        CountdownTimer, SessionIntent, SessionSnapshot, SessionState,
        state::DEFAULT_COUNTDOWN_SECONDS,
    },
    store::DEFAULT_ALBUM,
};

use std::{panic::Location, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

/// Tunables for a [`SessionController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Countdown length in seconds. Values below 1 are raised to 1.
    pub countdown_seconds: u32,
    /// Time between countdown ticks.
    pub tick_interval: Duration,
    /// Album finished clips are saved into.
    pub album: String,
    /// Camera selected at startup.
    pub initial_facing: CameraFacing,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
            tick_interval: Duration::from_secs(1),
            album: DEFAULT_ALBUM.to_string(),
            initial_facing: CameraFacing::default(),
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not counting down, or the tick came from a cancelled timer.
    Ignored,
    /// Decremented; seconds left.
    Counting(u32),
    /// Reached zero and the capture device started recording.
    RecordingStarted,
}

/// Result of a stop that ran off the session loop.
#[derive(Debug)]
pub struct StopOutcome {
    capture_id: Option<Uuid>,
    clip: Result<MediaHandle, CaptureError>,
    save: Option<Result<MediaHandle, StoreError>>,
}

/// A stop that has been accepted by the controller but not yet resolved.
///
/// Owns everything it needs, so [`resolve`](Self::resolve) can run on a
/// separate task while the controller keeps handling intents.
pub struct PendingStop {
    capture_id: Option<Uuid>,
    device: Arc<dyn CaptureDevice>,
    store: Arc<dyn MediaStore>,
    album: String,
}

impl PendingStop {
    /// Stop the device, then persist the clip if one was produced.
    #[instrument(skip(self), fields(capture_id = ?self.capture_id))]
    pub async fn resolve(self) -> StopOutcome {
        let clip = self.device.stop_recording().await;

        let save = match &clip {
            Ok(handle) => Some(persist(self.store.as_ref(), handle, &self.album).await),
            Err(_) => None,
        };

        StopOutcome {
            capture_id: self.capture_id,
            clip,
            save,
        }
    }
}

async fn persist(
    store: &dyn MediaStore,
    handle: &MediaHandle,
    album: &str,
) -> Result<MediaHandle, StoreError> {
    if !store.request_access().await? {
        return Err(StoreError::AccessDenied {
            location: ErrorLocation::from(Location::caller()),
        });
    }
    store.save(handle, album).await
}

/// Owns the recording session lifecycle: Idle, CountingDown, Recording.
///
/// Every mutation goes through one of the named operations. An operation
/// called in the wrong phase is rejected with a [`SessionError`] and leaves
/// the state untouched. After each operation a fresh [`SessionSnapshot`]
/// is published to subscribers.
pub struct SessionController {
    state: SessionState,
    settings: ControllerSettings,
    device: Arc<dyn CaptureDevice>,
    store: Arc<dyn MediaStore>,
    timer: Option<CountdownTimer>,
    epoch: u64,
    tick_tx: Option<mpsc::Sender<SessionIntent>>,
    capture_id: Option<Uuid>,
    stop_pending: bool,
    notice: Option<SessionNotice>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl SessionController {
    /// Create a controller with all state at defaults.
    ///
    /// Without [`attach_ticks`](Self::attach_ticks) no timer runs and the
    /// countdown only advances through explicit [`tick`](Self::tick) calls.
    pub fn new(
        device: Arc<dyn CaptureDevice>,
        store: Arc<dyn MediaStore>,
        mut settings: ControllerSettings,
    ) -> Self {
        settings.countdown_seconds = settings.countdown_seconds.max(1);
        let state = SessionState::new(settings.countdown_seconds, settings.initial_facing);
        let (snapshot_tx, _) = watch::channel(SessionSnapshot::capture(&state, false, None));

        info!(
            countdown_seconds = settings.countdown_seconds,
            album = %settings.album,
            facing = %settings.initial_facing,
            "SessionController initialized"
        );

        Self {
            state,
            settings,
            device,
            store,
            timer: None,
            epoch: 0,
            tick_tx: None,
            capture_id: None,
            stop_pending: false,
            notice: None,
            snapshot_tx,
        }
    }

    /// Route countdown timer ticks into `tick_tx`.
    pub fn attach_ticks(&mut self, tick_tx: mpsc::Sender<SessionIntent>) {
        self.tick_tx = Some(tick_tx);
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Settings this controller was built with.
    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Snapshot of the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.state, self.stop_pending, self.notice)
    }

    /// Receive a snapshot after every operation.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Whether a countdown timer is currently owned.
    pub fn has_active_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// Ask the capture device for camera access.
    ///
    /// A refusal while counting down cancels the countdown. A device error
    /// during the request counts as a refusal.
    #[instrument(skip(self))]
    pub async fn request_permission(&mut self) -> CoreResult<()> {
        let granted = match self.device.request_authorization().await {
            Ok(granted) => granted,
            Err(e) => {
                warn!(error = ?e, "Authorization request failed, treating as denied");
                false
            }
        };

        let result = if granted {
            self.state.permission = PermissionStatus::Granted;
            info!("Camera permission granted");
            Ok(())
        } else {
            self.state.permission = PermissionStatus::Denied;
            if self.state.phase == Phase::CountingDown {
                self.return_to_idle();
                info!("Countdown cancelled, camera permission revoked");
            }
            warn!("Camera permission denied");
            Err(SessionError::PermissionDenied {
                location: ErrorLocation::from(Location::caller()),
            })
        };

        self.settle(result)
    }

    /// Start the countdown that gates every recording.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn begin_countdown(&mut self) -> CoreResult<()> {
        let result = self.try_begin_countdown();
        self.settle(result)
    }

    #[track_caller]
    fn try_begin_countdown(&mut self) -> CoreResult<()> {
        if self.state.phase != Phase::Idle {
            return Err(SessionError::DeviceBusy {
                reason: format!("cannot start a countdown while {:?}", self.state.phase),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !self.state.has_capture_permission() {
            return Err(SessionError::PermissionDenied {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.state.phase = Phase::CountingDown;
        self.state.countdown_remaining = self.settings.countdown_seconds;
        self.epoch += 1;

        if let Some(tick_tx) = &self.tick_tx {
            self.timer = Some(CountdownTimer::start(
                self.settings.tick_interval,
                self.epoch,
                tick_tx.clone(),
            ));
        }

        info!(
            epoch = self.epoch,
            seconds = self.state.countdown_remaining,
            "Countdown started"
        );

        Ok(())
    }

    /// Advance the countdown by one unit.
    ///
    /// Decrements by exactly one per call. The call whose decrement reaches
    /// zero starts the capture device and moves to Recording. Outside
    /// CountingDown this does nothing.
    #[instrument(skip(self))]
    pub async fn tick(&mut self) -> CoreResult<TickOutcome> {
        if self.state.phase != Phase::CountingDown || self.state.countdown_remaining == 0 {
            trace!(phase = ?self.state.phase, "Tick ignored");
            return Ok(TickOutcome::Ignored);
        }

        self.state.countdown_remaining -= 1;

        if self.state.countdown_remaining > 0 {
            debug!(remaining = self.state.countdown_remaining, "Countdown tick");
            return self.settle(Ok(TickOutcome::Counting(self.state.countdown_remaining)));
        }

        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }

        let result = self
            .start_capture()
            .await
            .map(|()| TickOutcome::RecordingStarted);
        self.settle(result)
    }

    /// [`tick`](Self::tick), but only for the timer that is currently live.
    pub async fn tick_from_timer(&mut self, epoch: u64) -> CoreResult<TickOutcome> {
        match &self.timer {
            Some(timer) if timer.epoch() == epoch => self.tick().await,
            _ => {
                trace!(epoch, live_epoch = self.epoch, "Stale timer tick ignored");
                Ok(TickOutcome::Ignored)
            }
        }
    }

    async fn start_capture(&mut self) -> CoreResult<()> {
        let facing = self.state.camera_facing;

        match self.device.start_recording(facing).await {
            Ok(()) => {
                let capture_id = Uuid::new_v4();
                self.state.phase = Phase::Recording;
                self.capture_id = Some(capture_id);
                info!(capture_id = %capture_id, facing = %facing, "Recording started");
                Ok(())
            }
            Err(e) => {
                error!(error = ?e, facing = %facing, "Capture device failed to start");
                self.return_to_idle();
                Err(SessionError::from(e))
            }
        }
    }

    /// Accept a stop request and hand back the work needed to resolve it.
    ///
    /// Phase stays Recording until [`complete_stop`](Self::complete_stop).
    #[track_caller]
    #[instrument(skip(self))]
    pub fn begin_stop(&mut self) -> CoreResult<PendingStop> {
        let result = self.try_begin_stop();
        self.settle(result)
    }

    #[track_caller]
    fn try_begin_stop(&mut self) -> CoreResult<PendingStop> {
        if self.state.phase != Phase::Recording {
            return Err(SessionError::CaptureAborted {
                reason: format!("no active recording while {:?}", self.state.phase),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.stop_pending {
            return Err(SessionError::CaptureAborted {
                reason: "a stop is already in flight".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.stop_pending = true;
        info!(capture_id = ?self.capture_id, "Stop requested");

        Ok(PendingStop {
            capture_id: self.capture_id,
            device: Arc::clone(&self.device),
            store: Arc::clone(&self.store),
            album: self.settings.album.clone(),
        })
    }

    /// Apply a resolved stop: back to Idle, remember the clip.
    ///
    /// A failed save still keeps the clip as `last_media` and reports
    /// [`SessionError::StorageError`].
    #[track_caller]
    #[instrument(skip(self, outcome), fields(capture_id = ?outcome.capture_id))]
    pub fn complete_stop(&mut self, outcome: StopOutcome) -> CoreResult<MediaHandle> {
        let result = self.try_complete_stop(outcome);
        self.settle(result)
    }

    #[track_caller]
    fn try_complete_stop(&mut self, outcome: StopOutcome) -> CoreResult<MediaHandle> {
        if !self.stop_pending || self.capture_id != outcome.capture_id {
            return Err(SessionError::CaptureAborted {
                reason: "stop result does not match an in-flight stop".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.stop_pending = false;
        self.return_to_idle();

        let handle = match outcome.clip {
            Ok(handle) => handle,
            Err(e) => {
                error!(error = ?e, "Capture device failed to stop");
                return Err(SessionError::from(e));
            }
        };

        self.state.last_media = Some(handle.clone());
        self.state.is_playing = false;

        match outcome.save {
            Some(Err(e)) => {
                warn!(handle = %handle, error = ?e, "Clip recorded but not saved");
                Err(SessionError::from(e))
            }
            Some(Ok(stored)) => {
                info!(
                    handle = %handle,
                    stored = %stored,
                    album = %self.settings.album,
                    "Recording saved"
                );
                Ok(handle)
            }
            None => Ok(handle),
        }
    }

    /// Stop recording and wait for the clip to be saved.
    pub async fn stop_capture(&mut self) -> CoreResult<MediaHandle> {
        let pending = self.begin_stop()?;
        let outcome = pending.resolve().await;
        self.complete_stop(outcome)
    }

    /// Switch between front and back camera. Rejected while recording.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn toggle_facing(&mut self) -> CoreResult<CameraFacing> {
        let result = if self.state.phase == Phase::Recording {
            Err(SessionError::DeviceBusy {
                reason: "cannot switch camera while recording".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
        } else {
            self.state.camera_facing = self.state.camera_facing.flipped();
            debug!(facing = %self.state.camera_facing, "Camera switched");
            Ok(self.state.camera_facing)
        };
        self.settle(result)
    }

    /// Play or pause the last clip. Needs a clip and an idle session.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn toggle_playback(&mut self) -> CoreResult<bool> {
        let result = self.try_toggle_playback();
        self.settle(result)
    }

    #[track_caller]
    fn try_toggle_playback(&mut self) -> CoreResult<bool> {
        if self.state.phase != Phase::Idle {
            return Err(SessionError::DeviceBusy {
                reason: "playback is only available while idle".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let Some(handle) = &self.state.last_media else {
            return Err(SessionError::NotFound {
                reason: "no clip to play".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        self.state.is_playing = !self.state.is_playing;
        debug!(handle = %handle, playing = self.state.is_playing, "Playback toggled");

        Ok(self.state.is_playing)
    }

    /// Look up the newest video in the media store.
    ///
    /// An empty store and a failed query both report
    /// [`SessionError::NotFound`]; they differ only in how they are logged.
    #[instrument(skip(self))]
    pub async fn discover_last_media(&mut self) -> CoreResult<MediaHandle> {
        if self.state.phase != Phase::Idle {
            let result = Err(SessionError::DeviceBusy {
                reason: "discovery is only available while idle".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
            return self.settle(result);
        }

        let result = match self.store.query_most_recent(MediaKind::Video).await {
            Ok(Some(handle)) => {
                info!(handle = %handle, "Found most recent video");
                self.state.last_media = Some(handle.clone());
                self.state.is_playing = false;
                Ok(handle)
            }
            Ok(None) => {
                info!("Media store has no videos");
                Err(SessionError::NotFound {
                    reason: "media store has no videos".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
            Err(e) => {
                warn!(error = ?e, "Most recent video lookup failed");
                Err(SessionError::NotFound {
                    reason: format!("lookup failed: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        };

        self.settle(result)
    }

    /// Cancel any timer and reset to Idle with a full countdown.
    fn return_to_idle(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        self.state.phase = Phase::Idle;
        self.state.countdown_remaining = self.settings.countdown_seconds;
        self.capture_id = None;
    }

    fn settle<T>(&mut self, result: CoreResult<T>) -> CoreResult<T> {
        self.notice = result.as_ref().err().map(SessionError::notice);
        self.snapshot_tx.send_replace(self.snapshot());
        result
    }
}
