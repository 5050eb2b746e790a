//! Field validation for request bodies
//!
//! Rules only look at values that are present and non-empty, except
//! [`Rules::required`] and [`Rules::filled`]. Field names are shown with
//! underscores as spaces, so `newsletter_id` reads "newsletter id".

use mailmaster_common::{FieldErrors, Result};
use std::str::FromStr;
use validator::ValidateEmail;

/// Collects per-field messages for one request
#[derive(Debug, Default)]
pub struct Rules {
    errors: FieldErrors,
}

fn attribute(field: &str) -> String {
    field.replace('_', " ")
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure; returns false when the value is missing or blank
    pub fn required(&mut self, field: &str, value: Option<&str>) -> bool {
        if present(value).is_some() {
            return true;
        }
        self.errors
            .add(field, format!("The {} field is required.", attribute(field)));
        false
    }

    /// A value that is sent must not be blank
    pub fn filled(&mut self, field: &str, value: Option<&str>) {
        if value.is_some() && present(value).is_none() {
            self.errors
                .add(field, format!("The {} field must have a value.", attribute(field)));
        }
    }

    pub fn max_chars(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(value) = present(value) {
            if value.chars().count() > max {
                self.errors.add(
                    field,
                    format!(
                        "The {} field must not be greater than {} characters.",
                        attribute(field),
                        max
                    ),
                );
            }
        }
    }

    pub fn min_chars(&mut self, field: &str, value: Option<&str>, min: usize) {
        if let Some(value) = present(value) {
            if value.chars().count() < min {
                self.errors.add(
                    field,
                    format!(
                        "The {} field must be at least {} characters.",
                        attribute(field),
                        min
                    ),
                );
            }
        }
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) {
        if let Some(value) = present(value) {
            let email = value.to_string();
            if !ValidateEmail::validate_email(&email) {
                self.errors.add(
                    field,
                    format!("The {} field must be a valid email address.", attribute(field)),
                );
            }
        }
    }

    /// `field` must equal `{field}_confirmation`
    pub fn confirmed(&mut self, field: &str, value: Option<&str>, confirmation: Option<&str>) {
        if present(value).is_some() && value != confirmation {
            self.errors.add(
                field,
                format!("The {} field confirmation does not match.", attribute(field)),
            );
        }
    }

    /// Parse a value that must belong to a known set
    pub fn one_of<T: FromStr>(&mut self, field: &str, value: Option<&str>) -> Option<T> {
        let value = present(value)?;
        match value.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.invalid_selection(field);
                None
            }
        }
    }

    /// "The selected ... is invalid." for references that do not resolve
    pub fn invalid_selection(&mut self, field: &str) {
        self.errors
            .add(field, format!("The selected {} is invalid.", attribute(field)));
    }

    /// "The ... has already been taken." for values another record holds
    pub fn taken(&mut self, field: &str) {
        self.errors
            .add(field, format!("The {} has already been taken.", attribute(field)));
    }

    pub fn has_errors(&self, field: &str) -> bool {
        self.errors.contains(field)
    }

    /// Fail with every collected message
    pub fn finish(self) -> Result<()> {
        self.errors.into_result()
    }
}
