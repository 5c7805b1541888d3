//! Pomodoro state machine.
//!
//! The session is wall-clock based: each phase stores an absolute deadline
//! and the remaining time is always recomputed as `end_time - now`. There is
//! no internal thread and no decrementing counter -- the caller invokes
//! `tick()` periodically, and a tick that arrives hours late (system sleep,
//! suspended process) still advances exactly one phase.
//!
//! ## Phase cycle
//!
//! ```text
//! Idle -> Work -> ShortBreak -> Work -> ... -> LongBreak -> Work -> ...
//! ```
//!
//! The long break replaces the short one after the configured number of
//! completed work sessions, and resets the counter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::format::format_countdown;
use crate::storage::PomodoroConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PomodoroPhase {
    Idle,
    Work,
    ShortBreak,
    LongBreak,
}

impl PomodoroPhase {
    /// Display name, as shown in status output.
    pub fn label(&self) -> &'static str {
        match self {
            PomodoroPhase::Idle => "Idle",
            PomodoroPhase::Work => "Working",
            PomodoroPhase::ShortBreak => "Short Break",
            PomodoroPhase::LongBreak => "Long Break",
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak)
    }
}

/// A work/break session driven by wall-clock deadlines.
///
/// Durations come from the [`PomodoroConfig`] snapshot passed into each
/// command, so a config edit applies from the next phase onward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroSession {
    phase: PomodoroPhase,
    /// Deadline for the current phase; `None` only when idle.
    end_time: Option<DateTime<Utc>>,
    /// Finished work phases since the last long break.
    completed_work_sessions: u32,
}

impl Default for PomodoroSession {
    fn default() -> Self {
        Self {
            phase: PomodoroPhase::Idle,
            end_time: None,
            completed_work_sessions: 0,
        }
    }
}

impl PomodoroSession {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> PomodoroPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == PomodoroPhase::Idle
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    /// Remaining seconds in the current phase, derived from the deadline.
    /// Zero when idle or when the deadline has passed.
    pub fn seconds_left(&self, now: DateTime<Utc>) -> u64 {
        match self.end_time {
            Some(end) => (end - now).num_seconds().max(0) as u64,
            None => 0,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        let seconds_left = self.seconds_left(now);
        let label = if self.is_idle() {
            self.phase.label().to_string()
        } else {
            format!("{} - {}", self.phase.label(), format_countdown(seconds_left))
        };
        Event::StateSnapshot {
            phase: self.phase,
            label,
            seconds_left,
            completed_work_sessions: self.completed_work_sessions,
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a work phase. Only valid when idle.
    pub fn start(&mut self, now: DateTime<Utc>, config: &PomodoroConfig) -> Option<Event> {
        if !self.is_idle() {
            return None; // Already running.
        }
        self.enter(PomodoroPhase::Work, now, config.work_minutes);
        Some(Event::PomodoroStarted {
            phase: self.phase,
            duration_secs: u64::from(config.work_minutes) * 60,
            at: now,
        })
    }

    /// Stop the session and return to idle, discarding the deadline and the
    /// completed-session count.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.is_idle() {
            return None;
        }
        *self = Self::default();
        Some(Event::PomodoroStopped { at: now })
    }

    /// Skip the current break and start a work phase immediately.
    pub fn skip_break(&mut self, now: DateTime<Utc>, config: &PomodoroConfig) -> Option<Event> {
        if !self.phase.is_break() {
            return None;
        }
        let from = self.phase;
        self.enter(PomodoroPhase::Work, now, config.work_minutes);
        Some(Event::BreakSkipped {
            from,
            duration_secs: u64::from(config.work_minutes) * 60,
            at: now,
        })
    }

    /// Call at least once per second while non-idle. Returns the transition
    /// event when the current deadline has been reached.
    pub fn tick(&mut self, now: DateTime<Utc>, config: &PomodoroConfig) -> Option<Event> {
        if self.is_idle() || self.seconds_left(now) > 0 {
            return None;
        }
        Some(self.advance(now, config))
    }

    /// Resume-from-suspend path: recompute the deadline once and advance at
    /// most one phase, no matter how many deadlines were slept through.
    pub fn reconcile(&mut self, now: DateTime<Utc>, config: &PomodoroConfig) -> Option<Event> {
        self.tick(now, config)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter(&mut self, phase: PomodoroPhase, now: DateTime<Utc>, minutes: u32) {
        self.phase = phase;
        self.end_time = Some(now + chrono::Duration::minutes(i64::from(minutes)));
    }

    /// Perform the deadline transition. Completing work increments the
    /// counter first, so the Nth completion produces the long break, which
    /// in turn resets the counter.
    fn advance(&mut self, now: DateTime<Utc>, config: &PomodoroConfig) -> Event {
        let from = self.phase;
        let (to, minutes, message) = match self.phase {
            PomodoroPhase::Work => {
                self.completed_work_sessions += 1;
                if self.completed_work_sessions >= config.sessions_before_long_break {
                    self.completed_work_sessions = 0;
                    (
                        PomodoroPhase::LongBreak,
                        config.long_break_minutes,
                        format!(
                            "Work done! Take a long break ({} min)",
                            config.long_break_minutes
                        ),
                    )
                } else {
                    (
                        PomodoroPhase::ShortBreak,
                        config.short_break_minutes,
                        format!(
                            "Work done! Take a short break ({} min)",
                            config.short_break_minutes
                        ),
                    )
                }
            }
            PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak => (
                PomodoroPhase::Work,
                config.work_minutes,
                format!("Break over! Time to focus ({} min)", config.work_minutes),
            ),
            PomodoroPhase::Idle => unreachable!("tick() returns early when idle"),
        };

        self.enter(to, now, minutes);
        Event::PomodoroPhaseEnded {
            from,
            to,
            message,
            completed_work_sessions: self.completed_work_sessions,
            duration_secs: u64::from(minutes) * 60,
            at: now,
        }
    }
}
