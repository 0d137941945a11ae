use crate::AppError;

use std::{panic::Location, str::FromStr};

use countdown_cam_core::SessionIntent;
use error_location::ErrorLocation;

/// Commands typed at the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    /// Ask for camera permission.
    Permit,
    /// Start the countdown.
    Start,
    /// Stop recording.
    Stop,
    /// Switch camera.
    Flip,
    /// Play or pause the last clip.
    Play,
    /// Find the newest saved video.
    Last,
    /// Print the current state.
    Status,
    /// Print the command list.
    Help,
    /// Exit.
    Quit,
}

/// Help text listing every command.
pub(crate) const HELP: &str = "\
commands:
  permit   ask for camera permission
  start    count down, then record
  stop     stop recording and save
  flip     switch front/back camera
  play     play or pause the last clip
  last     find the newest saved video
  status   show the current state
  help     show this list
  quit     exit";

impl UiCommand {
    /// The session intent this command dispatches, if any.
    pub fn intent(self) -> Option<SessionIntent> {
        match self {
            UiCommand::Permit => Some(SessionIntent::RequestPermission),
            UiCommand::Start => Some(SessionIntent::BeginCountdown),
            UiCommand::Stop => Some(SessionIntent::StopCapture),
            UiCommand::Flip => Some(SessionIntent::ToggleFacing),
            UiCommand::Play => Some(SessionIntent::TogglePlayback),
            UiCommand::Last => Some(SessionIntent::DiscoverLastMedia),
            UiCommand::Status | UiCommand::Help | UiCommand::Quit => None,
        }
    }
}

impl FromStr for UiCommand {
    type Err = AppError;

    #[track_caller]
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "permit" | "p" => Ok(UiCommand::Permit),
            "start" | "s" | "record" => Ok(UiCommand::Start),
            "stop" | "x" => Ok(UiCommand::Stop),
            "flip" | "f" => Ok(UiCommand::Flip),
            "play" => Ok(UiCommand::Play),
            "last" | "l" => Ok(UiCommand::Last),
            "status" | "" => Ok(UiCommand::Status),
            "help" | "h" | "?" => Ok(UiCommand::Help),
            "quit" | "q" | "exit" => Ok(UiCommand::Quit),
            _ => Err(AppError::UnknownCommand {
                input: input.trim().to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
