//! System sound playback.
//!
//! Plays macOS system sounds by spawning `afplay`, fire-and-forget. Sound
//! paths are resolved once at construction rather than per call.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::warn;
use workchime_core::NotificationsConfig;

pub struct SoundPlayer {
    enabled: bool,
    chime_path: PathBuf,
    pomodoro_path: PathBuf,
}

impl SoundPlayer {
    pub fn new(config: &NotificationsConfig) -> Self {
        Self {
            enabled: config.enabled,
            chime_path: system_sound_path(&config.chime_sound),
            pomodoro_path: system_sound_path(&config.pomodoro_sound),
        }
    }

    pub fn play_chime(&self) {
        self.play(&self.chime_path);
    }

    pub fn play_pomodoro_alert(&self) {
        self.play(&self.pomodoro_path);
    }

    fn play(&self, path: &Path) {
        if !self.enabled {
            return;
        }
        // A busy audio device or missing file is logged, never propagated.
        if let Err(e) = Command::new("afplay")
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            warn!("failed to play {}: {e}", path.display());
        }
    }
}

fn system_sound_path(name: &str) -> PathBuf {
    PathBuf::from(format!("/System/Library/Sounds/{name}.aiff"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_system_sound_paths() {
        assert_eq!(
            system_sound_path("Hero"),
            PathBuf::from("/System/Library/Sounds/Hero.aiff")
        );
        let player = SoundPlayer::new(&NotificationsConfig::default());
        assert_eq!(player.chime_path, system_sound_path("Hero"));
        assert_eq!(player.pomodoro_path, system_sound_path("Ping"));
    }
}
