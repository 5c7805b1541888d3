use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pomodoro::PomodoroPhase;

/// Every state change in the system produces an Event.
/// The agent logs them and fires side effects; the CLI prints them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A chime qualified for the current minute.
    ChimeDue {
        hour: u8,
        minute: u8,
        minutes_since_midnight: u32,
        at: DateTime<Utc>,
    },
    PomodoroStarted {
        phase: PomodoroPhase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// A phase deadline was reached and the session advanced.
    PomodoroPhaseEnded {
        from: PomodoroPhase,
        to: PomodoroPhase,
        /// User-facing transition message, e.g. "Work done! Take a short break (5 min)".
        message: String,
        completed_work_sessions: u32,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    PomodoroStopped {
        at: DateTime<Utc>,
    },
    /// A break was skipped; work restarts immediately.
    BreakSkipped {
        from: PomodoroPhase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: PomodoroPhase,
        /// Menu-style one-liner, e.g. "Working - 24:59".
        label: String,
        seconds_left: u64,
        completed_work_sessions: u32,
        at: DateTime<Utc>,
    },
}
