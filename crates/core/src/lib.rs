//! Store Ratings Core - Shared types library.
//!
//! This crate provides common types used across all Store Ratings components:
//! - `server` - JSON web service holding the in-memory Data Store
//! - `cli` - Command-line tools for seeding and checking validation rules
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no locking,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles and star values
//! - [`validation`] - Field validation rules used by the account and store forms

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{Field, ValidationError};
