//! Chime scheduling: is a chime due "now", and when is the next one.
//!
//! The scheduler holds only two pieces of state, the mute expiry and the
//! minute-of-day at which a chime last fired. Everything else is read from a
//! [`ChimeSettings`] snapshot passed into each call, so an evaluation never
//! observes a half-updated configuration.
//!
//! The dedupe marker is updated in the same call that decides "due", before
//! any side effect runs. A failed sound or notification therefore cannot
//! re-arm the same minute.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::format::format_hour;
use crate::storage::ChimeSettings;

/// A chime that qualified for the current minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChimeDue {
    pub hour: u8,
    pub minute: u8,
    pub minutes_since_midnight: u32,
}

/// Next-chime projection, for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextChime {
    /// Chime is disabled in settings.
    Disabled,
    /// Next chime fires today at this hour.
    At(u8),
    /// The active window is over; next chime is tomorrow at the start hour.
    Tomorrow(u8),
}

impl NextChime {
    /// Menu-style one-liner: "Next: 3 PM", "Next: Tomorrow 9 AM".
    pub fn label(&self) -> String {
        match self {
            NextChime::Disabled => "Next: Disabled".to_string(),
            NextChime::At(hour) => format!("Next: {}", format_hour(*hour)),
            NextChime::Tomorrow(hour) => format!("Next: Tomorrow {}", format_hour(*hour)),
        }
    }
}

/// Per-minute chime decision state: mute window plus dedupe marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChimeScheduler {
    /// Minutes since midnight of the last fired chime, -1 when never fired.
    /// There is no midnight reset: the value is naturally overwritten by the
    /// next qualifying minute, which never repeats within a day.
    #[serde(default = "default_last_played")]
    last_played_minute: i32,
    /// While `now` is before this instant, evaluation short-circuits to
    /// not-due regardless of the other settings.
    #[serde(default)]
    mute_until: Option<DateTime<Utc>>,
}

fn default_last_played() -> i32 {
    -1
}

impl Default for ChimeScheduler {
    fn default() -> Self {
        Self {
            last_played_minute: -1,
            mute_until: None,
        }
    }
}

impl ChimeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_played_minute(&self) -> i32 {
        self.last_played_minute
    }

    pub fn mute_until(&self) -> Option<DateTime<Utc>> {
        self.mute_until
    }

    pub fn is_muted(&self, now: DateTime<Utc>) -> bool {
        matches!(self.mute_until, Some(expiry) if now < expiry)
    }

    /// Suppress chimes until `now + minutes`.
    pub fn mute_for(&mut self, now: DateTime<Utc>, minutes: i64) {
        self.mute_until = Some(now + chrono::Duration::minutes(minutes));
    }

    pub fn unmute(&mut self) {
        self.mute_until = None;
    }

    /// Decide whether a chime is due at `now` and, if so, mark the minute as
    /// played. The marker moves with the decision, not with the side effect,
    /// so two evaluations within the same qualifying minute yield due once.
    pub fn evaluate<Tz: TimeZone>(
        &mut self,
        now: &DateTime<Tz>,
        settings: &ChimeSettings,
    ) -> Option<ChimeDue> {
        let due = self.check(now, settings)?;
        self.last_played_minute = due.minutes_since_midnight as i32;
        Some(due)
    }

    /// Pure due check against a settings snapshot; does not touch the marker.
    fn check<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        settings: &ChimeSettings,
    ) -> Option<ChimeDue> {
        if !settings.enabled {
            return None;
        }
        if self.is_muted(now.with_timezone(&Utc)) {
            return None;
        }
        // Hand-edited config can carry a zero frequency; treat as never due.
        if settings.frequency_minutes == 0 {
            return None;
        }

        let weekday = now.weekday().num_days_from_monday() as usize;
        if !settings.days[weekday] {
            return None;
        }

        let hour = now.hour();
        if hour < u32::from(settings.start_hour) || hour >= u32::from(settings.end_hour) {
            return None;
        }

        let minute = now.minute();
        let minutes_since_midnight = hour * 60 + minute;
        if minutes_since_midnight % settings.frequency_minutes != 0 {
            return None;
        }
        if minutes_since_midnight as i32 == self.last_played_minute {
            return None;
        }

        Some(ChimeDue {
            hour: hour as u8,
            minute: minute as u8,
            minutes_since_midnight,
        })
    }
}

/// Round `now` up to the next frequency multiple, clamped into the active
/// window. Display only; never consulted by `evaluate`.
pub fn next_chime<Tz: TimeZone>(now: &DateTime<Tz>, settings: &ChimeSettings) -> NextChime {
    if !settings.enabled || settings.frequency_minutes == 0 {
        return NextChime::Disabled;
    }

    let hour = now.hour();
    let minute = now.minute();

    let mut next_hour = hour;
    if minute > 0 || (hour * 60) % settings.frequency_minutes != 0 {
        let current_minutes = hour * 60 + minute;
        let next_minutes =
            (current_minutes / settings.frequency_minutes + 1) * settings.frequency_minutes;
        next_hour = next_minutes / 60;
    }

    if next_hour < u32::from(settings.start_hour) {
        NextChime::At(settings.start_hour)
    } else if next_hour >= u32::from(settings.end_hour) {
        NextChime::Tomorrow(settings.start_hour)
    } else {
        NextChime::At(next_hour as u8)
    }
}

/// Time remaining in the active window: "Work day ended", "45 min until
/// 6 PM", "2h 30m until 6 PM". Display only.
pub fn hours_until_end_of_day<Tz: TimeZone>(
    now: &DateTime<Tz>,
    settings: &ChimeSettings,
) -> String {
    let hour = now.hour();
    let end_hour = u32::from(settings.end_hour);

    if hour >= end_hour {
        return "Work day ended".to_string();
    }

    let current_minutes = hour * 60 + now.minute();
    let remaining_minutes = end_hour * 60 - current_minutes;
    let hours_left = remaining_minutes / 60;
    let mins_left = remaining_minutes % 60;
    let end_label = format_hour(settings.end_hour);

    if hours_left == 0 {
        format!("{mins_left} min until {end_label}")
    } else if mins_left == 0 {
        format!(
            "{hours_left} hr{} until {end_label}",
            if hours_left > 1 { "s" } else { "" }
        )
    } else {
        format!("{hours_left}h {mins_left}m until {end_label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // 2026-08-26 is a Wednesday.
    fn wednesday(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 26, hour, minute, 0).unwrap()
    }

    #[test]
    fn disabled_is_never_due() {
        let settings = ChimeSettings {
            enabled: false,
            ..ChimeSettings::default()
        };
        let mut scheduler = ChimeScheduler::new();
        assert!(scheduler.evaluate(&wednesday(10, 0), &settings).is_none());
        assert!(scheduler.evaluate(&wednesday(12, 0), &settings).is_none());
    }

    #[test]
    fn due_on_frequency_multiple_inside_window() {
        let settings = ChimeSettings::default(); // 9-18, every 60 min, all days
        let mut scheduler = ChimeScheduler::new();
        let due = scheduler.evaluate(&wednesday(10, 0), &settings).unwrap();
        assert_eq!(due.hour, 10);
        assert_eq!(due.minute, 0);
        assert_eq!(due.minutes_since_midnight, 600);
        assert_eq!(scheduler.last_played_minute(), 600);
    }

    #[test]
    fn non_multiple_minute_is_not_due() {
        let settings = ChimeSettings::default();
        let mut scheduler = ChimeScheduler::new();
        assert!(scheduler.evaluate(&wednesday(10, 1), &settings).is_none());
        assert!(scheduler.evaluate(&wednesday(10, 59), &settings).is_none());
    }

    #[test]
    fn second_evaluation_in_same_minute_is_deduped() {
        let settings = ChimeSettings::default();
        let mut scheduler = ChimeScheduler::new();
        assert!(scheduler.evaluate(&wednesday(10, 0), &settings).is_some());
        assert!(scheduler.evaluate(&wednesday(10, 0), &settings).is_none());
        // The next qualifying minute fires again.
        assert!(scheduler.evaluate(&wednesday(11, 0), &settings).is_some());
    }

    #[test]
    fn window_boundaries_are_half_open() {
        let settings = ChimeSettings {
            frequency_minutes: 15,
            ..ChimeSettings::default()
        };
        let mut scheduler = ChimeScheduler::new();
        assert!(scheduler.evaluate(&wednesday(8, 59), &settings).is_none());
        assert!(scheduler.evaluate(&wednesday(9, 0), &settings).is_some());
        assert!(scheduler.evaluate(&wednesday(17, 45), &settings).is_some());
        assert!(scheduler.evaluate(&wednesday(18, 0), &settings).is_none());
    }

    #[test]
    fn disabled_weekday_is_not_due() {
        let mut settings = ChimeSettings::default();
        settings.days[2] = false; // Wednesday
        let mut scheduler = ChimeScheduler::new();
        assert!(scheduler.evaluate(&wednesday(10, 0), &settings).is_none());

        settings.days[2] = true;
        assert!(scheduler.evaluate(&wednesday(10, 0), &settings).is_some());
    }

    #[test]
    fn mute_suppresses_until_expiry() {
        let settings = ChimeSettings::default();
        let mut scheduler = ChimeScheduler::new();
        scheduler.mute_for(wednesday(9, 30), 60); // muted until 10:30

        assert!(scheduler.is_muted(wednesday(10, 0)));
        assert!(scheduler.evaluate(&wednesday(10, 0), &settings).is_none());
        assert!(scheduler.evaluate(&wednesday(10, 29), &settings).is_none());

        // Exactly at expiry muting no longer applies.
        assert!(!scheduler.is_muted(wednesday(10, 30)));
        assert!(scheduler.evaluate(&wednesday(11, 0), &settings).is_some());
    }

    #[test]
    fn unmute_clears_the_window() {
        let mut scheduler = ChimeScheduler::new();
        scheduler.mute_for(wednesday(9, 30), 60);
        scheduler.unmute();
        assert!(scheduler.mute_until().is_none());
        assert!(!scheduler.is_muted(wednesday(9, 31)));
    }

    #[test]
    fn zero_frequency_never_due() {
        let settings = ChimeSettings {
            frequency_minutes: 0,
            ..ChimeSettings::default()
        };
        let mut scheduler = ChimeScheduler::new();
        assert!(scheduler.evaluate(&wednesday(10, 0), &settings).is_none());
    }

    #[test]
    fn dedupe_marker_carries_across_midnight() {
        let settings = ChimeSettings {
            start_hour: 0,
            end_hour: 23,
            ..ChimeSettings::default()
        };
        let mut scheduler = ChimeScheduler::new();

        // Last chime of day one.
        assert!(scheduler
            .evaluate(&Utc.with_ymd_and_hms(2026, 8, 26, 22, 0, 0).unwrap(), &settings)
            .is_some());
        assert_eq!(scheduler.last_played_minute(), 22 * 60);

        // Day two recomputes minutes-since-midnight fresh; no reset needed.
        assert!(scheduler
            .evaluate(&Utc.with_ymd_and_hms(2026, 8, 27, 0, 0, 0).unwrap(), &settings)
            .is_some());
        assert_eq!(scheduler.last_played_minute(), 0);
        assert!(scheduler
            .evaluate(&Utc.with_ymd_and_hms(2026, 8, 27, 0, 0, 30).unwrap(), &settings)
            .is_none());
        // Same minute-of-day as day one fires again on day two.
        assert!(scheduler
            .evaluate(&Utc.with_ymd_and_hms(2026, 8, 27, 22, 0, 0).unwrap(), &settings)
            .is_some());
    }

    #[test]
    fn next_chime_rounds_up_and_clamps() {
        let settings = ChimeSettings::default(); // 9-18, every 60 min

        assert_eq!(next_chime(&wednesday(10, 15), &settings), NextChime::At(11));
        // Exactly on a multiple reports the current hour.
        assert_eq!(next_chime(&wednesday(10, 0), &settings), NextChime::At(10));
        // Before the window clamps to the start hour.
        assert_eq!(next_chime(&wednesday(6, 10), &settings), NextChime::At(9));
        // At or past the window end rolls to tomorrow.
        assert_eq!(
            next_chime(&wednesday(17, 30), &settings),
            NextChime::Tomorrow(9)
        );
        assert_eq!(
            next_chime(&wednesday(23, 59), &settings),
            NextChime::Tomorrow(9)
        );

        let disabled = ChimeSettings {
            enabled: false,
            ..ChimeSettings::default()
        };
        assert_eq!(next_chime(&wednesday(10, 0), &disabled), NextChime::Disabled);
    }

    #[test]
    fn next_chime_labels() {
        assert_eq!(NextChime::At(15).label(), "Next: 3 PM");
        assert_eq!(NextChime::Tomorrow(9).label(), "Next: Tomorrow 9 AM");
        assert_eq!(NextChime::Disabled.label(), "Next: Disabled");
    }

    #[test]
    fn end_of_day_countdown() {
        let settings = ChimeSettings::default(); // ends at 18
        assert_eq!(hours_until_end_of_day(&wednesday(18, 5), &settings), "Work day ended");
        assert_eq!(
            hours_until_end_of_day(&wednesday(17, 15), &settings),
            "45 min until 6 PM"
        );
        assert_eq!(
            hours_until_end_of_day(&wednesday(16, 0), &settings),
            "2 hrs until 6 PM"
        );
        assert_eq!(
            hours_until_end_of_day(&wednesday(15, 30), &settings),
            "2h 30m until 6 PM"
        );
    }
}
