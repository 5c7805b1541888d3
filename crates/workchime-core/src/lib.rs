//! # Workchime Core Library
//!
//! This library provides the core logic for workchime, a work-hours chime
//! and Pomodoro utility. It is built CLI-first: all decisions are made here,
//! and the `workchime` binary is a thin layer that drives the schedulers and
//! performs side effects (notifications, sound).
//!
//! ## Architecture
//!
//! - **Chime scheduler**: decides from a wall-clock instant and a settings
//!   snapshot whether a chime is due now, at most once per qualifying minute
//! - **Pomodoro state machine**: a wall-clock-deadline-based phase cycle that
//!   requires the caller to periodically invoke `tick()`
//! - **Storage**: TOML-based configuration and a small JSON runtime snapshot
//!
//! ## Key Components
//!
//! - [`ChimeScheduler`]: per-minute chime decision with mute and dedupe
//! - [`PomodoroSession`]: work/break phase state machine
//! - [`Config`]: application configuration management
//! - [`RuntimeState`]: persisted scheduler state between invocations

pub mod chime;
pub mod error;
pub mod events;
pub mod format;
pub mod pomodoro;
pub mod storage;

pub use chime::{ChimeDue, ChimeScheduler, NextChime};
pub use error::{ConfigError, CoreError, StateError};
pub use events::Event;
pub use pomodoro::{PomodoroPhase, PomodoroSession};
pub use storage::{
    with_state_lock, ChimeSettings, Config, NotificationsConfig, PomodoroConfig, RuntimeState,
};
