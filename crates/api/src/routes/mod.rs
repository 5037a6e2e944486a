//! HTTP route handlers.

pub mod activity;
pub mod admin;
pub mod auth;
pub mod backup;
pub mod candidates;
pub mod governorates;
pub mod health;
pub mod messaging;
pub mod news;
pub mod reports;
pub mod site;
pub mod voting;

use serde::Serialize;

/// Plain acknowledgment body for mutations.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Maps declarative payload validation failures to the first Arabic
/// message, one error at a time like the original forms.
pub fn first_validation_error(errors: &validator::ValidationErrors) -> crate::error::ApiError {
    let message = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "يرجى ملء جميع الحقول المطلوبة".to_string());

    crate::error::ApiError::Validation(message)
}
