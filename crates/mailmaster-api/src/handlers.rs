//! API request handlers

pub mod accounts;
pub mod campaigns;
pub mod health;
pub mod newsletters;
pub mod subscribers;

pub use health::*;

use serde::Serialize;

/// Plain `{message}` response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
