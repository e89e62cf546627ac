//! `quesera security ...`

use account::SecurityStore;
use anyhow::Result;
use clap::Subcommand;

use super::print_json;

#[derive(Subcommand, Debug)]
pub enum SecurityAction {
    /// Show two-factor state, password age and login activity.
    Show,

    /// Change the account password. Prompts for anything not given.
    Password {
        #[arg(long)]
        current: Option<String>,
        #[arg(long)]
        new: Option<String>,
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Turn two-factor authentication on or off.
    TwoFactor {
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },

    /// List login activity, newest first.
    Activity,

    /// Record a login in the activity list.
    RecordLogin {
        #[arg(long)]
        device: String,
        #[arg(long, default_value = "")]
        location: String,
        /// Mark this login as the current session.
        #[arg(long)]
        current: bool,
    },

    /// Remove every login except the current session.
    SignOutOthers,
}

/// Prompt on the terminal without echo.
fn prompt_hidden(prompt: &str) -> Result<String> {
    Ok(rpassword::prompt_password(prompt)?)
}

/// Fill in missing password fields through `prompt`. The current password is
/// only asked for once one has been set.
fn change_password(
    store: &SecurityStore,
    current: Option<String>,
    new: Option<String>,
    confirm: Option<String>,
    mut prompt: impl FnMut(&str) -> Result<String>,
) -> Result<()> {
    let current = match current {
        Some(v) => v,
        None if store.settings()?.has_password() => prompt("Current password: ")?,
        None => String::new(),
    };
    let new = match new {
        Some(v) => v,
        None => prompt("New password: ")?,
    };
    let confirm = match confirm {
        Some(v) => v,
        None => prompt("Confirm new password: ")?,
    };
    store.change_password(&current, &new, &confirm)?;
    Ok(())
}

fn parse_toggle(state: &str) -> bool {
    state == "on"
}

pub fn run(store: &SecurityStore, action: SecurityAction) -> Result<()> {
    match action {
        SecurityAction::Show => {
            let settings = store.settings()?;
            print_json(&serde_json::json!({
                "passwordSet": settings.has_password(),
                "passwordChangedAt": settings.password_changed_at,
                "twoFactorEnabled": settings.two_factor_enabled,
                "loginActivity": settings.login_activity,
            }))
        }
        SecurityAction::Password { current, new, confirm } => {
            change_password(store, current, new, confirm, prompt_hidden)?;
            println!("Password updated.");
            Ok(())
        }
        SecurityAction::TwoFactor { state } => {
            let settings = store.set_two_factor(parse_toggle(&state))?;
            print_json(&serde_json::json!({ "twoFactorEnabled": settings.two_factor_enabled }))
        }
        SecurityAction::Activity => print_json(&store.login_activity()?),
        SecurityAction::RecordLogin {
            device,
            location,
            current,
        } => print_json(&store.record_login(&device, &location, current)?),
        SecurityAction::SignOutOthers => {
            let removed = store.clear_other_sessions()?;
            println!("Signed out {} other session(s).", removed);
            Ok(())
        }
    }
}
