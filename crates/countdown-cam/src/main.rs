//! Countdown-Cam: terminal front end for a countdown-then-record camera session.

mod app;
mod config;
mod error;
mod logging;
mod render;
mod simulated_camera;
mod ui_command;

pub(crate) use {
    app::App,
    error::{AppError, Result as AppResult},
    simulated_camera::SimulatedCamera,
    ui_command::UiCommand,
};

use crate::config::{Config, StorageBackend};

use std::{sync::Arc, time::Duration};

use countdown_cam_core::{
    DirectoryMediaStore, MediaStore, MemoryMediaStore, SessionController, SessionRunner,
};
use tokio::sync::watch;
use tracing::{error, info, warn};

/// How long the session loop gets to wind down after the UI exits.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Application entry point.
fn main() {
    let (config, config_path) = match Config::load() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    logging::init_tracing(&config.logging);
    info!(path = ?config_path, "Configuration loaded");

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {:?}", e);
        std::process::exit(1);
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async {
        if let Err(e) = run(config).await {
            error!(error = ?e, "App error");
            std::process::exit(1);
        }
    });
}

async fn run(config: Config) -> AppResult<()> {
    let camera = Arc::new(SimulatedCamera::new(
        config.camera.scratch_dir.clone(),
        config.camera.grant_permission,
    ));

    let store: Arc<dyn MediaStore> = match config.storage.backend {
        StorageBackend::Directory => Arc::new(DirectoryMediaStore::new(
            config.storage.root_dir.clone(),
            config.storage.recency,
        )),
        StorageBackend::Memory => Arc::new(MemoryMediaStore::new()),
    };
    info!(backend = ?config.storage.backend, "Media store ready");

    let controller = SessionController::new(camera, store, config.controller_settings());
    let runner = SessionRunner::new(controller);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let app = App {
        session: runner.handle(),
        snapshots: runner.subscribe(),
        shutdown_tx,
    };

    let session_task = tokio::spawn(runner.run(shutdown_rx));

    let result = app.run().await;

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, session_task).await {
        Ok(Ok(controller)) => {
            info!(last_media = ?controller.state().last_media, "Session loop joined");
        }
        Ok(Err(e)) => error!(error = ?e, "Session task panicked"),
        Err(_) => warn!("Session loop did not stop within timeout"),
    }

    result
}
