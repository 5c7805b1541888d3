use clap::{Parser, Subcommand};

mod commands;
mod login_item;
mod notify;
mod sound;

#[derive(Parser)]
#[command(name = "workchime", version, about = "Work-hours chime and Pomodoro timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the foreground agent (timers, sounds, notifications)
    Run,
    /// Pomodoro timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Chime status and mute control
    Chime {
        #[command(subcommand)]
        action: commands::chime::ChimeAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Launch-at-login management
    Login {
        #[command(subcommand)]
        action: commands::login::LoginAction,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run => commands::run::run(),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Chime { action } => commands::chime::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Login { action } => commands::login::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
