//! MailMaster API - REST API server
//!
//! This crate provides the REST API for MailMaster: bearer token
//! authentication, newsletter, subscriber and campaign resources, and the
//! campaign send and preview actions.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod pagination;
pub mod routes;
pub mod validation;

pub use auth::AppState;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
