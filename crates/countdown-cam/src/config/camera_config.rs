use crate::config::default_grant_permission;

use std::path::PathBuf;

use countdown_cam_core::CameraFacing;
use serde::{Deserialize, Serialize};

/// Simulated camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Camera selected at startup.
    #[serde(default)]
    pub initial_facing: CameraFacing,

    /// Answer the simulated camera gives to permission requests.
    #[serde(default = "default_grant_permission")]
    pub grant_permission: bool,

    /// Where freshly captured clips are written before being saved.
    pub scratch_dir: PathBuf,
}
