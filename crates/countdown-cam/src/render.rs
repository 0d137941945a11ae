use countdown_cam_core::{PermissionStatus, Phase, SessionSnapshot};

/// One status line for the terminal.
pub(crate) fn status_line(snapshot: &SessionSnapshot) -> String {
    let mut line = match snapshot.phase {
        Phase::Idle => {
            let permission = match snapshot.permission {
                PermissionStatus::Unknown => "not asked",
                PermissionStatus::Granted => "granted",
                PermissionStatus::Denied => "denied",
            };
            let last = match &snapshot.last_media {
                Some(handle) if snapshot.is_playing => format!("{} (playing)", handle),
                Some(handle) => handle.to_string(),
                None => "none".to_string(),
            };
            format!(
                "[idle] camera: {} | permission: {} | last clip: {}",
                snapshot.camera_facing, permission, last
            )
        }
        Phase::CountingDown => format!(
            "[countdown] {} ... ({} camera)",
            snapshot.countdown_remaining, snapshot.camera_facing
        ),
        Phase::Recording if snapshot.stop_pending => "[recording] saving ...".to_string(),
        Phase::Recording => format!(
            "[recording] {} camera, type 'stop' to finish",
            snapshot.camera_facing
        ),
    };

    if let Some(notice) = snapshot.notice {
        line.push_str(" ! ");
        line.push_str(notice.message());
    }

    line
}
