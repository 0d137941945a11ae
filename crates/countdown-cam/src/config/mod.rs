mod camera_config;
#[allow(clippy::module_inception)]
mod config;
mod countdown_config;
mod logging_config;
mod storage_config;

pub(crate) use {
    camera_config::CameraConfig,
    config::Config,
    countdown_config::CountdownConfig,
    logging_config::LoggingConfig,
    storage_config::{StorageBackend, StorageConfig},
};

pub(crate) const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
pub(crate) const DEFAULT_GRANT_PERMISSION: bool = true;
pub(crate) const DEFAULT_LOG_FILTER: &str = "countdown_cam=debug,countdown_cam_core=debug";

pub(crate) fn default_countdown_seconds() -> u32 {
    countdown_cam_core::DEFAULT_COUNTDOWN_SECONDS
}

pub(crate) fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

pub(crate) fn default_grant_permission() -> bool {
    DEFAULT_GRANT_PERMISSION
}

pub(crate) fn default_album() -> String {
    countdown_cam_core::DEFAULT_ALBUM.to_string()
}

pub(crate) fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}
