//! Login and signup credential types.
//!
//! Passwords are wrapped in [`SecretString`] so they are redacted from
//! `Debug` output and never logged by accident. Serialization onto the
//! wire happens at request-build time via `expose_secret()`.

use secrecy::SecretString;

use crate::types::username::{Username, UsernameError};

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors from client-side credential validation.
#[derive(thiserror::Error, Debug, Clone)]
pub enum CredentialsError {
    /// Invalid username format.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// Password too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    /// Password and confirmation do not match.
    #[error("passwords do not match")]
    PasswordMismatch,
}

/// Username and password for login.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Account username.
    pub username: Username,
    /// Account password (redacted in `Debug`).
    pub password: SecretString,
}

impl Credentials {
    /// Build credentials from raw form input.
    ///
    /// # Errors
    ///
    /// Returns an error if the username is malformed. Password rules are
    /// not enforced at login; the server decides whether it matches.
    pub fn new(username: &str, password: &str) -> Result<Self, CredentialsError> {
        Ok(Self {
            username: Username::parse(username)?,
            password: SecretString::from(password.to_owned()),
        })
    }
}

/// Details for creating a new account.
///
/// Validation mirrors the server's signup rules so obviously bad input
/// never leaves the client: username format, minimum password length,
/// and matching confirmation.
#[derive(Debug, Clone)]
pub struct SignupDetails {
    /// Requested username.
    pub username: Username,
    /// Chosen password (redacted in `Debug`).
    pub password: SecretString,
}

impl SignupDetails {
    /// Build and validate signup details from raw form input.
    ///
    /// # Errors
    ///
    /// Returns an error if the username is malformed, the password is
    /// shorter than [`MIN_PASSWORD_LENGTH`], or the confirmation does not
    /// match.
    pub fn new(username: &str, password: &str, confirm: &str) -> Result<Self, CredentialsError> {
        let username = Username::parse(username)?;

        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(CredentialsError::PasswordTooShort);
        }

        if password != confirm {
            return Err(CredentialsError::PasswordMismatch);
        }

        Ok(Self {
            username,
            password: SecretString::from(password.to_owned()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_credentials_new() {
        let creds = Credentials::new("shopper42", "hunter2!").unwrap();
        assert_eq!(creds.username.as_str(), "shopper42");
        assert_eq!(creds.password.expose_secret(), "hunter2!");
    }

    #[test]
    fn test_credentials_rejects_bad_username() {
        assert!(matches!(
            Credentials::new("", "hunter2!"),
            Err(CredentialsError::InvalidUsername(_))
        ));
    }

    #[test]
    fn test_password_redacted_in_debug() {
        let creds = Credentials::new("shopper42", "hunter2!").unwrap();
        let debug = format!("{creds:?}");
        assert!(!debug.contains("hunter2!"));
    }

    #[test]
    fn test_signup_validation() {
        assert!(SignupDetails::new("shopper42", "longenough", "longenough").is_ok());
        assert!(matches!(
            SignupDetails::new("shopper42", "short", "short"),
            Err(CredentialsError::PasswordTooShort)
        ));
        assert!(matches!(
            SignupDetails::new("shopper42", "longenough", "different1"),
            Err(CredentialsError::PasswordMismatch)
        ));
    }
}
