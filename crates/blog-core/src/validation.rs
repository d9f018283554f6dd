//! Explicit validation of inbound submissions.

use std::fmt;

use serde::Serialize;

use crate::domain::{Category, PostDraft};
use crate::error::DomainError;

pub const TITLE_MAX_CHARS: usize = 120;
pub const CONTENT_MAX_CHARS: usize = 10_000;

/// A single failed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field error found in one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} invalid field(s)", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }
}

/// A post as received, before any checks. Every field is kept as the
/// client's text so type mismatches surface as field errors.
#[derive(Debug, Clone, Default)]
pub struct PostSubmission {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub author_id: Option<String>,
}

impl PostSubmission {
    /// Check every field and report all failures at once.
    pub fn validate(self) -> Result<PostDraft, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let title = required_text(&mut errors, "title", self.title, TITLE_MAX_CHARS);
        let content = required_text(&mut errors, "content", self.content, CONTENT_MAX_CHARS);

        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push("category", "must not be blank");
                None
            }
            Some(raw) => match raw.parse::<Category>() {
                Ok(category) => Some(category),
                Err(e) => {
                    errors.push("category", e.to_string());
                    None
                }
            },
        };

        let author_id = match self.author_id.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push("author_id", "must be present");
                None
            }
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) if id > 0 => Some(id),
                Ok(_) => {
                    errors.push("author_id", "must be a positive id");
                    None
                }
                Err(_) => {
                    errors.push("author_id", format!("not a whole number: {raw}"));
                    None
                }
            },
        };

        match (title, content, category, author_id) {
            (Some(title), Some(content), Some(category), Some(author_id)) if errors.is_empty() => {
                Ok(PostDraft {
                    title,
                    content,
                    category,
                    author_id,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<String>,
    max_chars: usize,
) -> Option<String> {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        errors.push(field, "must not be blank");
        return None;
    }
    if value.chars().count() > max_chars {
        errors.push(field, format!("must be at most {max_chars} characters"));
        return None;
    }
    Some(value)
}

/// Signup checks: a plausible email and a non-empty password.
pub fn validate_signup(email: &str, password: &str) -> Result<(), DomainError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::Validation("Invalid email address".to_string()));
    }
    if password.is_empty() {
        return Err(DomainError::Validation(
            "Password must not be empty".to_string(),
        ));
    }
    Ok(())
}
