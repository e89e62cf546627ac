pub mod batch;
pub mod profile;
pub mod security;

pub use batch::BatchAction;
pub use profile::ProfileAction;
pub use security::SecurityAction;

use serde::Serialize;

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
