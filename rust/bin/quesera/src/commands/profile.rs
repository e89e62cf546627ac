//! `quesera profile ...`

use account::ProfileStore;
use anyhow::Result;
use clap::Subcommand;

use super::print_json;

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// Show the profile.
    Show,

    /// Change profile fields. Only the given fields change.
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        farm: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
}

pub fn run(store: &ProfileStore, action: ProfileAction) -> Result<()> {
    match action {
        ProfileAction::Show => print_json(&store.get()?),
        ProfileAction::Set {
            name,
            email,
            phone,
            farm,
            role,
            location,
            bio,
        } => {
            let patch = field_patch([
                ("fullName", name),
                ("email", email),
                ("phone", phone),
                ("farmName", farm),
                ("role", role),
                ("location", location),
                ("bio", bio),
            ])?;
            print_json(&store.update(&patch)?)
        }
    }
}

/// Merge patch holding only the flags that were given.
fn field_patch<const N: usize>(fields: [(&str, Option<String>); N]) -> Result<serde_json::Value> {
    let patch: serde_json::Map<String, serde_json::Value> = fields
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), serde_json::Value::String(v))))
        .collect();
    if patch.is_empty() {
        anyhow::bail!("Nothing to change. Pass at least one field flag.");
    }
    Ok(serde_json::Value::Object(patch))
}
