mod config;
mod state;

pub use config::{ChimeSettings, Config, NotificationsConfig, PomodoroConfig, FREQUENCIES};
pub use state::RuntimeState;

use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::StateError;

/// Returns `~/.config/workchime[-dev]/` based on WORKCHIME_ENV.
///
/// Set WORKCHIME_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WORKCHIME_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("workchime-dev")
    } else {
        base_dir.join("workchime")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Write `content` to a temp file in the same directory, then rename it over
/// `path`. A concurrent reader sees either the old content or the new content,
/// never a partial write.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)
}

/// Run `f` while holding an exclusive advisory lock on `path`, blocking until
/// the lock is free. The lock file itself carries no data.
pub fn with_file_lock<T>(path: &Path, f: impl FnOnce() -> T) -> Result<T, StateError> {
    let lock_failed = |message: String| StateError::LockFailed {
        path: path.to_path_buf(),
        message,
    };
    let file = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| lock_failed(e.to_string()))?;
    file.lock_exclusive().map_err(|e| lock_failed(e.to_string()))?;
    let result = f();
    // The lock is released when `file` is dropped.
    Ok(result)
}

/// Serialize a whole snapshot load-modify-save span against other processes.
/// Both the agent's tick paths and the one-shot commands mutate `state.json`
/// this way; an unguarded write could otherwise be lost to an interleaved one.
pub fn with_state_lock<T>(f: impl FnOnce() -> T) -> Result<T, StateError> {
    let dir = data_dir().map_err(|e| StateError::LockFailed {
        path: PathBuf::from("~/.config/workchime"),
        message: e.to_string(),
    })?;
    with_file_lock(&dir.join("state.lock"), f)
}
