//! Boundary validation for request payloads
//!
//! Request DTOs carry `Option` fields so that a missing value is reported
//! the same way as a blank one: as a field-level message, never as a
//! deserialization failure.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One violated rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All violations found in one payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            fields: vec![FieldError {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|e| e.field == field)
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Collects violations while extracting validated values from a DTO.
///
/// Extraction methods always return a value (a default when the input is
/// missing) so a DTO can be checked in one pass; `finish` decides.
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.fields.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Non-blank text of at most `max_len` characters
    pub fn required_text(
        &mut self,
        field: &str,
        label: &str,
        value: Option<String>,
        max_len: usize,
    ) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => {
                self.check_length(field, label, &v, max_len);
                v
            }
            _ => {
                self.push(field, format!("{} is required", label));
                String::new()
            }
        }
    }

    /// Optional text; only the length ceiling applies
    pub fn optional_text(
        &mut self,
        field: &str,
        label: &str,
        value: Option<String>,
        max_len: usize,
    ) -> Option<String> {
        if let Some(v) = &value {
            self.check_length(field, label, v, max_len);
        }
        value
    }

    /// Any non-null value (numbers, dates, ids)
    pub fn required<T: Default>(&mut self, field: &str, label: &str, value: Option<T>) -> T {
        match value {
            Some(v) => v,
            None => {
                self.push(field, format!("{} is required", label));
                T::default()
            }
        }
    }

    pub fn check(&mut self, condition: bool, field: &str, message: impl Into<String>) {
        if !condition {
            self.push(field, message);
        }
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    fn check_length(&mut self, field: &str, label: &str, value: &str, max_len: usize) {
        if value.chars().count() > max_len {
            self.push(
                field,
                format!("{} must not exceed {} characters", label, max_len),
            );
        }
    }
}
