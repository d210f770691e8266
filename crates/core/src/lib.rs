//! Sunbird Core - Shared domain types.
//!
//! This crate provides the common types used across the Sunbird client
//! components:
//!
//! - `client` - The SDK proper (session, gateway, cart, checkout, services)
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles, and
//!   order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
