mod profile;
mod security;

pub use profile::*;
pub use security::*;
