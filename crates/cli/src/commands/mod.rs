//! CLI subcommand implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Resolve the database URL from `CARTWHEEL_DATABASE_URL` with a fallback to
/// the generic `DATABASE_URL`.
pub fn database_url() -> Result<SecretString, &'static str> {
    std::env::var("CARTWHEEL_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "CARTWHEEL_DATABASE_URL not set")
}
