//! Error type and result alias

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the primary error type for the engine, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details for debugging
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the category for this error
    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// Whether the caller can recover by retrying with corrected input
    pub fn is_recoverable(&self) -> bool {
        self.category().is_recoverable()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a forbidden error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::Forbidden, msg)
    }

    /// Create a not-owner error
    pub fn not_owner(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NotOwner, msg)
    }

    /// Create an invalid transition error
    pub fn transition(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidTransition, msg)
    }

    /// Create a not-found error with a resource detail
    pub fn not_found(code: ErrorCode, resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(code, format!("{} not found", r)).with_detail("resource", r)
    }

    /// Create a conflict error
    pub fn conflict(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self::with_message(code, msg)
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PersistenceFailed, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
