use crate::config::{default_countdown_seconds, default_tick_interval_ms};

use serde::{Deserialize, Serialize};

/// Countdown timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Seconds counted down before every recording.
    #[serde(default = "default_countdown_seconds")]
    pub seconds: u32,

    /// Milliseconds between countdown ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}
