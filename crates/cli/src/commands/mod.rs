//! CLI command implementations.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;

use thiserror::Error;

use basil_client::StoreClient;
use basil_core::Credentials;

/// Errors from the credential environment handshake.
#[derive(Debug, Error)]
pub enum CliAuthError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),
}

/// Log in with `BASIL_USERNAME` / `BASIL_PASSWORD`.
///
/// Authenticated commands call this before doing anything else; the
/// session cookie then lives in the client's shared jar for the rest of
/// the process.
///
/// # Errors
///
/// Returns an error if the variables are missing or login fails.
pub async fn authenticate(client: &StoreClient) -> Result<(), Box<dyn std::error::Error>> {
    let username =
        std::env::var("BASIL_USERNAME").map_err(|_| CliAuthError::MissingEnvVar("BASIL_USERNAME"))?;
    let password =
        std::env::var("BASIL_PASSWORD").map_err(|_| CliAuthError::MissingEnvVar("BASIL_PASSWORD"))?;

    let credentials = Credentials::new(&username, &password)?;
    let session = client.session().login(&credentials).await?;

    tracing::debug!(
        authenticated = session.authenticated(),
        is_admin = session.is_admin(),
        "logged in"
    );

    Ok(())
}
