//! Single-consumer event loop around [`SessionController`].
//!
//! Presentation intents and countdown ticks share one channel, so the
//! controller only ever sees one intent at a time and needs no locking.
//! Stops resolve on a spawned task and come back as
//! [`SessionIntent::StopResolved`].

use crate::{
    CoreResult,
    session::{SessionController, SessionSnapshot, StopOutcome},
};

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Capacity of the intent channel.
pub const INTENT_CHANNEL_CAPACITY: usize = 32;

/// How long shutdown waits for an in-flight stop to resolve.
const STOP_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything the session loop can be asked to do.
#[derive(Debug)]
pub enum SessionIntent {
    /// Ask for camera permission.
    RequestPermission,
    /// Start the countdown.
    BeginCountdown,
    /// Countdown timer tick from the timer with this epoch.
    Tick {
        /// Epoch of the timer that produced the tick.
        epoch: u64,
    },
    /// Stop recording.
    StopCapture,
    /// A stop finished resolving off the loop.
    StopResolved(StopOutcome),
    /// Switch camera.
    ToggleFacing,
    /// Play or pause the last clip.
    TogglePlayback,
    /// Look up the newest video in the media store.
    DiscoverLastMedia,
    /// Leave the loop.
    Shutdown,
}

/// Cloneable sender for intents.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    intent_tx: mpsc::Sender<SessionIntent>,
}

impl SessionHandle {
    /// Queue an intent for the session loop.
    pub async fn dispatch(
        &self,
        intent: SessionIntent,
    ) -> Result<(), mpsc::error::SendError<SessionIntent>> {
        self.intent_tx.send(intent).await
    }

    /// Queue [`SessionIntent::RequestPermission`].
    pub async fn request_permission(&self) -> Result<(), mpsc::error::SendError<SessionIntent>> {
        self.dispatch(SessionIntent::RequestPermission).await
    }

    /// Queue [`SessionIntent::BeginCountdown`].
    pub async fn begin_countdown(&self) -> Result<(), mpsc::error::SendError<SessionIntent>> {
        self.dispatch(SessionIntent::BeginCountdown).await
    }

    /// Queue [`SessionIntent::StopCapture`].
    pub async fn stop_capture(&self) -> Result<(), mpsc::error::SendError<SessionIntent>> {
        self.dispatch(SessionIntent::StopCapture).await
    }

    /// Queue [`SessionIntent::ToggleFacing`].
    pub async fn toggle_facing(&self) -> Result<(), mpsc::error::SendError<SessionIntent>> {
        self.dispatch(SessionIntent::ToggleFacing).await
    }

    /// Queue [`SessionIntent::TogglePlayback`].
    pub async fn toggle_playback(&self) -> Result<(), mpsc::error::SendError<SessionIntent>> {
        self.dispatch(SessionIntent::TogglePlayback).await
    }

    /// Queue [`SessionIntent::DiscoverLastMedia`].
    pub async fn discover_last_media(&self) -> Result<(), mpsc::error::SendError<SessionIntent>> {
        self.dispatch(SessionIntent::DiscoverLastMedia).await
    }

    /// Queue [`SessionIntent::Shutdown`].
    pub async fn shutdown(&self) -> Result<(), mpsc::error::SendError<SessionIntent>> {
        self.dispatch(SessionIntent::Shutdown).await
    }
}

/// Owns the controller and applies intents to it one at a time.
pub struct SessionRunner {
    controller: SessionController,
    intent_tx: mpsc::Sender<SessionIntent>,
    intent_rx: mpsc::Receiver<SessionIntent>,
}

impl SessionRunner {
    /// Wrap `controller` and route its countdown ticks into the loop.
    pub fn new(mut controller: SessionController) -> Self {
        let (intent_tx, intent_rx) = mpsc::channel(INTENT_CHANNEL_CAPACITY);
        controller.attach_ticks(intent_tx.clone());

        Self {
            controller,
            intent_tx,
            intent_rx,
        }
    }

    /// Sender for presentation intents.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            intent_tx: self.intent_tx.clone(),
        }
    }

    /// Snapshot stream of the wrapped controller.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.controller.subscribe()
    }

    /// Run until [`SessionIntent::Shutdown`] or the shutdown signal fires.
    ///
    /// Returns the controller so its final state can be inspected.
    #[instrument(skip_all)]
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) -> SessionController {
        info!("Session loop starting");

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Session loop shutdown signalled");
                    break;
                }

                // The loop holds its own sender, so the channel never closes.
                Some(intent) = self.intent_rx.recv() => {
                    if !self.apply(intent).await {
                        info!("Shutdown requested");
                        break;
                    }
                }
            }
        }

        self.drain_pending_stop().await;

        info!("Session loop stopped");
        self.controller
    }

    /// Apply one intent. Returns false when the loop should exit.
    async fn apply(&mut self, intent: SessionIntent) -> bool {
        debug!(intent = ?intent, "Applying intent");

        let result: CoreResult<()> = match intent {
            SessionIntent::RequestPermission => self.controller.request_permission().await,
            SessionIntent::BeginCountdown => self.controller.begin_countdown(),
            SessionIntent::Tick { epoch } => {
                self.controller.tick_from_timer(epoch).await.map(|_| ())
            }
            SessionIntent::StopCapture => self.controller.begin_stop().map(|pending| {
                let intent_tx = self.intent_tx.clone();
                tokio::spawn(async move {
                    let outcome = pending.resolve().await;
                    if intent_tx
                        .send(SessionIntent::StopResolved(outcome))
                        .await
                        .is_err()
                    {
                        warn!("Session loop gone before stop resolved");
                    }
                });
            }),
            SessionIntent::StopResolved(outcome) => {
                self.controller.complete_stop(outcome).map(|_| ())
            }
            SessionIntent::ToggleFacing => self.controller.toggle_facing().map(|_| ()),
            SessionIntent::TogglePlayback => self.controller.toggle_playback().map(|_| ()),
            SessionIntent::DiscoverLastMedia => {
                self.controller.discover_last_media().await.map(|_| ())
            }
            SessionIntent::Shutdown => return false,
        };

        if let Err(e) = result {
            warn!(notice = ?e.notice(), error = %e, "Intent rejected");
        }

        true
    }

    /// An issued stop is never abandoned; give it a bounded chance to land.
    async fn drain_pending_stop(&mut self) {
        if !self.controller.snapshot().stop_pending {
            return;
        }

        info!("Waiting for in-flight stop to resolve");

        let controller = &mut self.controller;
        let intent_rx = &mut self.intent_rx;
        let drained = tokio::time::timeout(STOP_DRAIN_TIMEOUT, async {
            while let Some(intent) = intent_rx.recv().await {
                if let SessionIntent::StopResolved(outcome) = intent {
                    if let Err(e) = controller.complete_stop(outcome) {
                        warn!(error = %e, "In-flight stop finished with error");
                    }
                    break;
                }
            }
        })
        .await;

        if drained.is_err() {
            warn!("In-flight stop did not resolve before shutdown");
        }
    }
}
