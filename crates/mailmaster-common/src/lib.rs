//! MailMaster Common - Shared types and utilities
//!
//! This crate provides configuration, the error taxonomy and the
//! identifier/role/status types shared across all MailMaster crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, FieldErrors, Result};
