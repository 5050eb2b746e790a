//! Error types for MailMaster

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Main error type for MailMaster
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Mail error: {0}")]
    Mail(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("The given data was invalid.")]
    Validation(FieldErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for MailMaster
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Config(_) => 500,
            Error::Database(_) => 500,
            Error::Mail(_) => 500,
            Error::Auth(_) => 401,
            Error::Validation(_) => 422,
            Error::NotFound(_) => 404,
            Error::PermissionDenied(_) => 403,
            Error::InvalidState(_) => 400,
            Error::BadRequest(_) => 400,
            Error::Internal(_) => 500,
            Error::Other(_) => 500,
        }
    }

    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "CONFIG_ERROR",
            Error::Database(_) => "DATABASE_ERROR",
            Error::Mail(_) => "MAIL_ERROR",
            Error::Auth(_) => "UNAUTHENTICATED",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::PermissionDenied(_) => "FORBIDDEN",
            Error::InvalidState(_) => "INVALID_STATE",
            Error::BadRequest(_) => "BAD_REQUEST",
            Error::Internal(_) => "INTERNAL_ERROR",
            Error::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error is caused by the server rather than the request
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Shorthand for a validation error on a single field
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        Error::Validation(errors)
    }
}

/// Per-field validation messages, serialized as `{field: [messages]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message for a field
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Merge another set of messages into this one
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for a field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when empty, otherwise a validation error carrying the messages
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::Auth("x".into()).status_code(), 401);
        assert_eq!(Error::PermissionDenied("x".into()).status_code(), 403);
        assert_eq!(Error::NotFound("x".into()).status_code(), 404);
        assert_eq!(Error::InvalidState("x".into()).status_code(), 400);
        assert_eq!(Error::validation("email", "taken").status_code(), 422);
        assert!(Error::Database("x".into()).is_server_error());
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let mut errors = FieldErrors::new();
        errors.add("email", "The email field is required.");
        errors.add("email", "The email must be a valid email address.");
        errors.add("name", "The name may not be greater than 255 characters.");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "email": [
                    "The email field is required.",
                    "The email must be a valid email address."
                ],
                "name": ["The name may not be greater than 255 characters."]
            })
        );
    }

    #[test]
    fn test_into_result() {
        assert!(FieldErrors::new().into_result().is_ok());

        let mut errors = FieldErrors::new();
        errors.add("title", "The title field is required.");
        let mut other = FieldErrors::new();
        other.add("subject", "The subject field is required.");
        errors.merge(other);

        match errors.into_result() {
            Err(Error::Validation(e)) => {
                assert!(e.contains("title"));
                assert!(e.contains("subject"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
