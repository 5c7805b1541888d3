//! The foreground agent: owns the periodic timers and fires side effects.
//!
//! Two independent cadences share the loop: a 30-second chime evaluation
//! aligned to the minute boundary, and a 1-second Pomodoro tick. State is
//! reloaded from disk on each pass so one-shot commands (`timer start`,
//! `chime mute`) issued while the agent runs are honored, and it is written
//! back before any sound or notification fires. Every load-modify-save span
//! holds the cross-process state lock.

use std::time::Duration;

use chrono::{Local, Timelike, Utc};
use log::{info, warn};
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use workchime_core::format::format_hour;
use workchime_core::{with_state_lock, Config, Event, RuntimeState};

use crate::notify;
use crate::sound::SoundPlayer;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(agent())
}

async fn agent() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    let sounds = SoundPlayer::new(&config.notifications);
    info!("agent started");

    // A chime due right now must not wait for the first periodic tick.
    evaluate_chime(&config, &sounds);

    // Align the first chime evaluation to the next minute boundary, then
    // re-check every 30 seconds; the dedupe marker makes the extra
    // mid-minute pass harmless.
    let to_boundary = 60 - u64::from(Local::now().second()).min(59);
    let mut chime_ticks = interval_at(
        Instant::now() + Duration::from_secs(to_boundary),
        Duration::from_secs(30),
    );
    chime_ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut pomodoro_ticks = interval(Duration::from_secs(1));
    pomodoro_ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Pick up `config set` edits made while the agent is running.
    let mut config_reload = interval(Duration::from_secs(60));
    config_reload.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // After a system sleep the next tick of either interval lands late;
    // both paths recompute from wall-clock time, so the first post-wake
    // pass is the reconciliation.
    loop {
        tokio::select! {
            _ = chime_ticks.tick() => evaluate_chime(&config, &sounds),
            _ = pomodoro_ticks.tick() => tick_pomodoro(&config, &sounds),
            _ = config_reload.tick() => config = Config::load_or_default(),
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }
    Ok(())
}

fn evaluate_chime(config: &Config, sounds: &SoundPlayer) {
    // The load-evaluate-save span runs under the state lock so a one-shot
    // command (`timer stop`, `chime mute`) cannot interleave with it. Side
    // effects fire after the lock is released.
    let due = with_state_lock(|| {
        let mut state = RuntimeState::load_or_default();
        let due = state.chime.evaluate(&Local::now(), &config.chime)?;
        // Persist the dedupe marker with the decision, before the side
        // effects: a failed sound or notification must not re-arm this
        // minute.
        if let Err(e) = state.save() {
            warn!("failed to persist chime marker: {e}");
        }
        Some(due)
    });
    let due = match due {
        Ok(Some(due)) => due,
        Ok(None) => return,
        Err(e) => {
            warn!("skipping chime evaluation: {e}");
            return;
        }
    };
    info!("chime due at {}:{:02}", due.hour, due.minute);
    sounds.play_chime();
    notify::notify("🔔 Hourly Chime", &format!("It's {}", format_hour(due.hour)));
}

fn tick_pomodoro(config: &Config, sounds: &SoundPlayer) {
    let event = with_state_lock(|| {
        let mut state = RuntimeState::load_or_default();
        if state.session.is_idle() {
            return None;
        }
        let event = state.session.tick(Utc::now(), &config.pomodoro)?;
        if let Err(e) = state.save() {
            warn!("failed to persist session state: {e}");
        }
        Some(event)
    });
    let event = match event {
        Ok(Some(event)) => event,
        Ok(None) => return,
        Err(e) => {
            warn!("skipping pomodoro tick: {e}");
            return;
        }
    };
    if let Event::PomodoroPhaseEnded { ref message, to, .. } = event {
        info!("pomodoro phase ended, now {}", to.label());
        sounds.play_pomodoro_alert();
        notify::notify("🍅 Pomodoro", message);
    }
}
