use chrono::Utc;
use clap::Subcommand;
use workchime_core::{with_state_lock, Config, RuntimeState};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a work session
    Start,
    /// Stop the session and return to idle
    Stop,
    /// Skip the current break and start working
    Skip,
    /// Print the current session state as JSON
    Status,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let now = Utc::now();

    // The whole load-modify-save span holds the state lock: a tick from the
    // running agent between our load and save would otherwise resurrect the
    // session this command just stopped.
    with_state_lock(move || -> Result<(), Box<dyn std::error::Error>> {
        let mut state = RuntimeState::load_or_default();

        // Catch up on any deadline that passed since the last invocation.
        // The session advances at most one phase no matter how long the gap
        // was.
        if let Some(event) = state.session.reconcile(now, &config.pomodoro) {
            println!("{}", serde_json::to_string_pretty(&event)?);
        }

        match action {
            TimerAction::Start => {
                if let Some(event) = state.session.start(now, &config.pomodoro) {
                    println!("{}", serde_json::to_string_pretty(&event)?);
                } else {
                    // Already running; show what is.
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&state.session.snapshot(now))?
                    );
                }
            }
            TimerAction::Stop => {
                if let Some(event) = state.session.stop(now) {
                    println!("{}", serde_json::to_string_pretty(&event)?);
                } else {
                    println!("{{\"type\": \"idle\"}}");
                }
            }
            TimerAction::Skip => {
                if let Some(event) = state.session.skip_break(now, &config.pomodoro) {
                    println!("{}", serde_json::to_string_pretty(&event)?);
                } else {
                    eprintln!("no break to skip");
                }
            }
            TimerAction::Status => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&state.session.snapshot(now))?
                );
            }
        }

        state.save()?;
        Ok(())
    })??;
    Ok(())
}
