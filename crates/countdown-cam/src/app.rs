use crate::{AppError, AppResult, UiCommand, render::status_line, ui_command::HELP};

use std::panic::Location;

use countdown_cam_core::{SessionHandle, SessionIntent, SessionSnapshot};
use error_location::ErrorLocation;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
};
use tracing::{debug, info, instrument, warn};

/// Terminal presentation layer.
///
/// Reads commands from stdin, forwards them to the session loop as intents
/// and prints every published snapshot. It never touches session state.
pub struct App {
    pub(crate) session: SessionHandle,
    pub(crate) snapshots: watch::Receiver<SessionSnapshot>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl App {
    /// Run until `quit`, end of input, or the session loop going away.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Countdown-Cam starting");
        println!("{}", HELP);
        println!("{}", status_line(&self.snapshots.borrow_and_update()));

        // Ask for the camera and look up the last saved clip on launch.
        self.dispatch(SessionIntent::RequestPermission).await?;
        self.dispatch(SessionIntent::DiscoverLastMedia).await?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line? {
                        Some(line) => {
                            if !self.handle_line(&line).await? {
                                info!("Quit requested");
                                break;
                            }
                        }
                        None => {
                            info!("Input closed, shutting down");
                            break;
                        }
                    }
                }

                changed = self.snapshots.changed() => {
                    if changed.is_err() {
                        warn!("Session loop ended");
                        break;
                    }
                    println!("{}", status_line(&self.snapshots.borrow_and_update()));
                }
            }
        }

        self.shut_down().await;
        info!("Countdown-Cam shut down");

        Ok(())
    }

    /// Ask the session loop to stop. Never fails: a loop that is already
    /// gone is only worth a debug line.
    pub(crate) async fn shut_down(&self) {
        // Shutdown intent first so queued intents are applied in order;
        // the watch signal covers a full channel.
        if let Err(e) = self.session.shutdown().await {
            debug!(error = %e, "Session loop already gone");
        }
        if let Err(e) = self.shutdown_tx.send(true) {
            debug!(error = %e, "Shutdown signal had no receiver");
        }
    }

    /// Handle one typed line. Returns false on quit.
    async fn handle_line(&mut self, line: &str) -> AppResult<bool> {
        let command = match line.parse::<UiCommand>() {
            Ok(command) => command,
            Err(e) => {
                debug!(error = %e, "Unrecognised input");
                println!("unknown command {:?}, type 'help'", line.trim());
                return Ok(true);
            }
        };

        match command {
            UiCommand::Quit => return Ok(false),
            UiCommand::Help => println!("{}", HELP),
            UiCommand::Status => println!("{}", status_line(&self.snapshots.borrow())),
            _ => {
                if let Some(intent) = command.intent() {
                    self.dispatch(intent).await?;
                }
            }
        }

        Ok(true)
    }

    async fn dispatch(&self, intent: SessionIntent) -> AppResult<()> {
        self.session
            .dispatch(intent)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send {:?}: {}", e.0, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
