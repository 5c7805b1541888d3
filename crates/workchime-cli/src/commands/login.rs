use clap::Subcommand;

use crate::login_item;

#[derive(Subcommand)]
pub enum LoginAction {
    /// Show whether launch at login is enabled
    Status,
    /// Register the agent to start at login
    Enable,
    /// Remove the login registration
    Disable,
}

pub fn run(action: LoginAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        LoginAction::Status => {
            println!(
                "{}",
                if login_item::is_enabled() {
                    "enabled"
                } else {
                    "disabled"
                }
            );
        }
        LoginAction::Enable => {
            login_item::enable()?;
            println!("launch at login enabled");
        }
        LoginAction::Disable => {
            login_item::disable()?;
            println!("launch at login disabled");
        }
    }
    Ok(())
}
