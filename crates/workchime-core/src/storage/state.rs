//! Runtime state snapshot.
//!
//! The scheduler state that must survive between CLI invocations and agent
//! restarts: the Pomodoro session, the chime dedupe marker, and the mute
//! expiry. Stored as JSON at `~/.config/workchime/state.json`. Because the
//! session stores an absolute deadline, a snapshot reloaded after an
//! arbitrary gap reconciles correctly on the next tick.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::chime::ChimeScheduler;
use crate::error::StateError;
use crate::pomodoro::PomodoroSession;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeState {
    #[serde(default)]
    pub session: PomodoroSession,
    #[serde(default)]
    pub chime: ChimeScheduler,
}

impl RuntimeState {
    fn path() -> Result<PathBuf, StateError> {
        let dir = data_dir().map_err(|e| StateError::ReadFailed {
            path: PathBuf::from("~/.config/workchime"),
            message: e.to_string(),
        })?;
        Ok(dir.join("state.json"))
    }

    /// Load the snapshot, falling back to the idle default when the file is
    /// missing or unreadable. A corrupt snapshot is never an error; the
    /// schedulers simply restart from idle.
    pub fn load_or_default() -> Self {
        match Self::path() {
            Ok(path) => Self::load_from(&path).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, StateError> {
        let read_failed = |message: String| StateError::ReadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| read_failed(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| read_failed(e.to_string()))
    }

    /// Persist the snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized or written.
    pub fn save(&self) -> Result<(), StateError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), StateError> {
        let write_failed = |message: String| StateError::WriteFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = serde_json::to_string(self).map_err(|e| write_failed(e.to_string()))?;
        // Same atomic-rename discipline as the config file: a reader gets
        // the previous snapshot or this one, never a torn mix.
        super::write_atomic(path, content.as_bytes()).map_err(|e| write_failed(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::PomodoroConfig;
    use chrono::{TimeZone, Utc};

    #[test]
    fn roundtrip_preserves_session_and_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let config = PomodoroConfig::default();
        let now = Utc.with_ymd_and_hms(2026, 8, 26, 9, 0, 0).unwrap();

        let mut state = RuntimeState::default();
        state.session.start(now, &config);
        state.chime.mute_for(now, 60);
        state.save_to(&path).unwrap();

        let loaded = RuntimeState::load_from(&path).unwrap();
        assert_eq!(loaded.session.phase(), state.session.phase());
        assert_eq!(loaded.session.end_time(), state.session.end_time());
        assert_eq!(loaded.chime.mute_until(), state.chime.mute_until());
        assert_eq!(loaded.chime.last_played_minute(), -1);
    }

    #[test]
    fn reload_after_gap_reconciles_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let config = PomodoroConfig::default();
        let start = Utc.with_ymd_and_hms(2026, 8, 26, 9, 0, 0).unwrap();

        let mut state = RuntimeState::default();
        state.session.start(start, &config);
        state.save_to(&path).unwrap();

        // Next invocation happens well past the work deadline.
        let wake = start + chrono::Duration::minutes(90);
        let mut loaded = RuntimeState::load_from(&path).unwrap();
        let event = loaded.session.reconcile(wake, &config);
        assert!(event.is_some());
        assert_eq!(loaded.session.phase(), crate::PomodoroPhase::ShortBreak);
        assert_eq!(loaded.session.seconds_left(wake), 5 * 60);
    }

    #[test]
    fn locked_stop_survives_a_concurrent_tick() {
        use crate::storage::with_file_lock;

        let dir = tempfile::tempdir().unwrap();
        let state_path = dir.path().join("state.json");
        let lock_path = dir.path().join("state.lock");

        let start = Utc.with_ymd_and_hms(2026, 8, 26, 9, 0, 0).unwrap();
        let mut state = RuntimeState::default();
        state.session.start(start, &PomodoroConfig::default());
        state.save_to(&state_path).unwrap();

        // Both sides arrive after the work deadline expired. Whichever order
        // the lock grants, a stopped session must stay stopped: tick-first
        // advances to a break that stop then clears; stop-first leaves an
        // idle session the tick refuses to touch.
        let late = start + chrono::Duration::minutes(30);

        let ticker = {
            let state_path = state_path.clone();
            let lock_path = lock_path.clone();
            std::thread::spawn(move || {
                with_file_lock(&lock_path, || {
                    let mut state = RuntimeState::load_from(&state_path).unwrap();
                    if state.session.is_idle() {
                        return;
                    }
                    state.session.tick(late, &PomodoroConfig::default());
                    state.save_to(&state_path).unwrap();
                })
                .unwrap();
            })
        };
        let stopper = {
            let state_path = state_path.clone();
            let lock_path = lock_path.clone();
            std::thread::spawn(move || {
                with_file_lock(&lock_path, || {
                    let mut state = RuntimeState::load_from(&state_path).unwrap();
                    state.session.reconcile(late, &PomodoroConfig::default());
                    state.session.stop(late);
                    state.save_to(&state_path).unwrap();
                })
                .unwrap();
            })
        };
        ticker.join().unwrap();
        stopper.join().unwrap();

        let settled = RuntimeState::load_from(&state_path).unwrap();
        assert!(settled.session.is_idle());
    }

    #[test]
    fn corrupt_snapshot_falls_back_to_idle_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{{{").unwrap();
        assert!(RuntimeState::load_from(&path).is_err());

        // The forgiving path restarts the schedulers from idle.
        let state = RuntimeState::load_from(&path).unwrap_or_default();
        assert!(state.session.is_idle());
        assert_eq!(state.session.seconds_left(Utc::now()), 0);
        assert_eq!(state.chime.last_played_minute(), -1);
        assert_eq!(state.chime.mute_until(), None);
    }
}
