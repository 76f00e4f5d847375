//! Core types for Basil.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod id;
pub mod price;
pub mod status;
pub mod username;

pub use credential::{Credentials, CredentialsError, SignupDetails};
pub use id::*;
pub use price::Price;
pub use status::*;
pub use username::{Username, UsernameError};
