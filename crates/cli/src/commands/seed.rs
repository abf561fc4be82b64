//! Seed the admin user.
//!
//! Every deployment needs exactly one ADMIN account before the catalog can
//! be managed; registration only ever creates ordinary users.

use tracing::info;

use cartwheel_core::{Email, Role};
use cartwheel_server::db::users::UserRepository;
use cartwheel_server::db::{self, RepositoryError};
use cartwheel_server::services::auth;

/// Create the admin user. A no-op (with a log line) if the email is already
/// registered, so the command is safe to run on every deploy.
///
/// # Errors
///
/// Returns an error if the environment is incomplete, the email is invalid,
/// or the database operation fails.
pub async fn admin(
    email: &str,
    username: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = super::database_url()?;
    let email = Email::parse(email)?;
    let password_hash = auth::hash_password(password)?;

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let users = UserRepository::new(&pool);
    match users.create(username, &email, &password_hash, Role::Admin).await {
        Ok(user) => info!("Admin user created: {} <{}>", user.username, user.email),
        Err(RepositoryError::Conflict(_)) => {
            info!("A user with email {email} already exists, skipping");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
