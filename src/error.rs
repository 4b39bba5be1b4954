//! Unified model error handling
//!
//! Every rejected operation surfaces as a `ModelError` before any state is touched.

use thiserror::Error;

use crate::services::store::StoreError;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error")]
    Storage(#[from] StoreError),
}

impl ModelError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Stable code for presentation layers to switch on.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Message safe to show in a dismissible notice.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::NotFound(msg) => msg.clone(),
            // Don't leak store internals
            Self::Storage(_) => "Saved data could not be read or written".to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ModelError::validation("x").error_code(), "VALIDATION_ERROR");
        assert_eq!(ModelError::not_found("x").error_code(), "NOT_FOUND");
    }

    #[test]
    fn storage_message_hides_details() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "/secret/path");
        let err = ModelError::from(StoreError::from(io));
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert!(!err.public_message().contains("/secret/path"));
    }
}
