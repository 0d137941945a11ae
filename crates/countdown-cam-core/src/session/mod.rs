mod controller;
mod countdown;
mod runner;
pub(crate) mod state;

pub use {
    controller::{ControllerSettings, PendingStop, SessionController, StopOutcome, TickOutcome},
    countdown::CountdownTimer,
    runner::{INTENT_CHANNEL_CAPACITY, SessionHandle, SessionIntent, SessionRunner},
    state::{
        CameraFacing, DEFAULT_COUNTDOWN_SECONDS, MediaHandle, MediaKind, PermissionStatus, Phase,
        SessionSnapshot, SessionState,
    },
};
