//! Domain error model.

use thiserror::Error;

/// Errors raised while turning request input into domain values.
///
/// Only identity problems live here. Storage and authorization failures have
/// their own error types in the crates that own those concerns.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A key could not be parsed from its textual form.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The key addressed by the request differs from the key in the body.
    #[error("key mismatch: path key '{path}' does not match body key '{body}'")]
    KeyMismatch { path: String, body: String },
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn key_mismatch(path: impl ToString, body: impl ToString) -> Self {
        Self::KeyMismatch {
            path: path.to_string(),
            body: body.to_string(),
        }
    }
}
