//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General / validation errors
/// - 1xxx: Authorization errors
/// - 2xxx: Transition errors
/// - 3xxx: Not-found errors
/// - 4xxx: Conflict errors
/// - 9xxx: Persistence / system errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General / validation errors (0xxx)
    Validation,
    /// Authorization errors (1xxx)
    Authorization,
    /// Transition errors (2xxx)
    Transition,
    /// Not-found errors (3xxx)
    NotFound,
    /// Conflict errors (4xxx)
    Conflict,
    /// Persistence / system errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::Validation,
            1000..2000 => Self::Authorization,
            2000..3000 => Self::Transition,
            3000..4000 => Self::NotFound,
            4000..5000 => Self::Conflict,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::Transition => "transition",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::System => "system",
        }
    }

    /// Whether errors of this category are recoverable by the caller
    ///
    /// Recoverable errors never leave the store in a partial state; the
    /// caller may retry with corrected input or a different action.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::System)
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
