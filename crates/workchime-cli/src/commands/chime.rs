use chrono::{DateTime, Local, Timelike, Utc};
use clap::Subcommand;
use workchime_core::format::format_hour;
use workchime_core::{chime, with_state_lock, Config, RuntimeState};

use crate::notify;
use crate::sound::SoundPlayer;

#[derive(Subcommand)]
pub enum ChimeAction {
    /// Show next chime and work-day status
    Status,
    /// Play the chime sound and show the notification once
    Test,
    /// Suppress chimes for a while
    Mute {
        /// Mute duration in minutes
        #[arg(long, default_value = "60")]
        minutes: i64,
    },
    /// Clear the mute window
    Unmute,
}

pub fn run(action: ChimeAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        ChimeAction::Status => {
            let state = RuntimeState::load_or_default();
            let now = Local::now();
            println!(
                "{}",
                if config.chime.enabled {
                    "Enabled"
                } else {
                    "Disabled"
                }
            );
            println!("{}", chime::next_chime(&now, &config.chime).label());
            println!("{}", chime::hours_until_end_of_day(&now, &config.chime));
            if state.chime.is_muted(Utc::now()) {
                if let Some(expiry) = state.chime.mute_until() {
                    println!(
                        "Muted until {}",
                        expiry.with_timezone(&Local).format("%-I:%M %p")
                    );
                }
            }
        }
        ChimeAction::Test => {
            let sounds = SoundPlayer::new(&config.notifications);
            sounds.play_chime();
            let hour = Local::now().hour() as u8;
            notify::notify("🔔 Hourly Chime", &format!("It's {}", format_hour(hour)));
        }
        ChimeAction::Mute { minutes } => {
            // Lock the mute update so an agent chime evaluation landing in
            // the middle cannot overwrite it with a stale snapshot.
            let expiry = with_state_lock(
                || -> Result<Option<DateTime<Utc>>, Box<dyn std::error::Error>> {
                    let mut state = RuntimeState::load_or_default();
                    state.chime.mute_for(Utc::now(), minutes);
                    state.save()?;
                    Ok(state.chime.mute_until())
                },
            )??;
            if let Some(expiry) = expiry {
                println!(
                    "Muted until {}",
                    expiry.with_timezone(&Local).format("%-I:%M %p")
                );
            }
        }
        ChimeAction::Unmute => {
            with_state_lock(|| -> Result<(), Box<dyn std::error::Error>> {
                let mut state = RuntimeState::load_or_default();
                state.chime.unmute();
                state.save()?;
                Ok(())
            })??;
            println!("Unmuted");
        }
    }

    Ok(())
}
