//! Basil Core - Shared types library.
//!
//! This crate provides common types used across all Basil components:
//! - `client` - Typed client for the storefront REST API
//! - `cli` - Command-line storefront and back-office tools
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, usernames, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
