//! Unified error codes for the marketplace lifecycle engine
//!
//! Error codes are organized by category:
//! - 0xxx: General / validation errors
//! - 1xxx: Authorization errors
//! - 2xxx: Transition errors
//! - 3xxx: Not-found errors
//! - 4xxx: Conflict errors
//! - 9xxx: Persistence / system errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General / Validation ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Invalid format
    InvalidFormat = 3,
    /// Required field missing
    RequiredField = 4,
    /// Value out of range
    ValueOutOfRange = 5,

    // ==================== 1xxx: Authorization ====================
    /// Caller's role is not permitted to run this command
    Forbidden = 1001,
    /// A specific role is required
    RoleRequired = 1002,
    /// Caller does not own the target entity
    NotOwner = 1003,

    // ==================== 2xxx: Transition ====================
    /// Requested status change is not in the adjacency table
    InvalidTransition = 2001,
    /// Entity is in a terminal status
    TerminalState = 2002,
    /// A delivery must exist before this transition
    DeliveryRequired = 2003,

    // ==================== 3xxx: Not Found ====================
    /// Order not found
    OrderNotFound = 3001,
    /// Payout not found
    PayoutNotFound = 3002,
    /// Dispute not found
    DisputeNotFound = 3003,
    /// Report not found
    ReportNotFound = 3004,
    /// Support ticket not found
    TicketNotFound = 3005,
    /// Project not found
    ProjectNotFound = 3006,
    /// Proposal not found
    ProposalNotFound = 3007,
    /// Review not found
    ReviewNotFound = 3008,
    /// Coupon not found
    CouponNotFound = 3009,

    // ==================== 4xxx: Conflict ====================
    /// Coupon expiry date has passed
    CouponExpired = 4001,
    /// Coupon usage limit reached
    CouponExhausted = 4002,
    /// Coupon has been deactivated
    CouponInactive = 4003,
    /// Payout amount exceeds the seller's available balance
    InsufficientBalance = 4004,
    /// Project already has an accepted proposal
    ProjectAlreadyAssigned = 4005,
    /// Order already has a review
    ReviewAlreadyExists = 4006,
    /// Order status does not allow opening a dispute
    OrderNotDisputable = 4007,
    /// Command id has already been processed
    DuplicateCommand = 4008,
    /// Coupon code already exists
    CouponCodeExists = 4009,
    /// Order is not completed yet
    OrderNotCompleted = 4010,

    // ==================== 9xxx: Persistence / System ====================
    /// Persistence gateway failure
    PersistenceFailed = 9001,
    /// Entity serialization failed
    SerializationFailed = 9002,
    /// Internal error
    InternalError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::InvalidFormat => "Invalid format",
            Self::RequiredField => "Required field missing",
            Self::ValueOutOfRange => "Value out of range",

            Self::Forbidden => "Operation not permitted for this role",
            Self::RoleRequired => "A specific role is required",
            Self::NotOwner => "Caller does not own this entity",

            Self::InvalidTransition => "Invalid status transition",
            Self::TerminalState => "Entity is in a terminal status",
            Self::DeliveryRequired => "A delivery is required first",

            Self::OrderNotFound => "Order not found",
            Self::PayoutNotFound => "Payout not found",
            Self::DisputeNotFound => "Dispute not found",
            Self::ReportNotFound => "Report not found",
            Self::TicketNotFound => "Support ticket not found",
            Self::ProjectNotFound => "Project not found",
            Self::ProposalNotFound => "Proposal not found",
            Self::ReviewNotFound => "Review not found",
            Self::CouponNotFound => "Coupon not found",

            Self::CouponExpired => "Coupon has expired",
            Self::CouponExhausted => "Coupon usage limit reached",
            Self::CouponInactive => "Coupon is not active",
            Self::InsufficientBalance => "Insufficient available balance",
            Self::ProjectAlreadyAssigned => "Project already has an accepted proposal",
            Self::ReviewAlreadyExists => "Order already has a review",
            Self::OrderNotDisputable => "Order status does not allow disputes",
            Self::DuplicateCommand => "Command has already been processed",
            Self::CouponCodeExists => "Coupon code already exists",
            Self::OrderNotCompleted => "Order is not completed",

            Self::PersistenceFailed => "Persistence failure",
            Self::SerializationFailed => "Serialization failure",
            Self::InternalError => "Internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::InvalidFormat,
            4 => Self::RequiredField,
            5 => Self::ValueOutOfRange,

            1001 => Self::Forbidden,
            1002 => Self::RoleRequired,
            1003 => Self::NotOwner,

            2001 => Self::InvalidTransition,
            2002 => Self::TerminalState,
            2003 => Self::DeliveryRequired,

            3001 => Self::OrderNotFound,
            3002 => Self::PayoutNotFound,
            3003 => Self::DisputeNotFound,
            3004 => Self::ReportNotFound,
            3005 => Self::TicketNotFound,
            3006 => Self::ProjectNotFound,
            3007 => Self::ProposalNotFound,
            3008 => Self::ReviewNotFound,
            3009 => Self::CouponNotFound,

            4001 => Self::CouponExpired,
            4002 => Self::CouponExhausted,
            4003 => Self::CouponInactive,
            4004 => Self::InsufficientBalance,
            4005 => Self::ProjectAlreadyAssigned,
            4006 => Self::ReviewAlreadyExists,
            4007 => Self::OrderNotDisputable,
            4008 => Self::DuplicateCommand,
            4009 => Self::CouponCodeExists,
            4010 => Self::OrderNotCompleted,

            9001 => Self::PersistenceFailed,
            9002 => Self::SerializationFailed,
            9003 => Self::InternalError,

            other => return Err(format!("unknown error code: {other}")),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::Forbidden.code(), 1001);
        assert_eq!(ErrorCode::InvalidTransition.code(), 2001);
        assert_eq!(ErrorCode::OrderNotFound.code(), 3001);
        assert_eq!(ErrorCode::CouponExpired.code(), 4001);
        assert_eq!(ErrorCode::PersistenceFailed.code(), 9001);
    }

    #[test]
    fn test_round_trip_through_u16() {
        let codes = [
            ErrorCode::ValidationFailed,
            ErrorCode::NotOwner,
            ErrorCode::TerminalState,
            ErrorCode::CouponNotFound,
            ErrorCode::InsufficientBalance,
            ErrorCode::InternalError,
        ];
        for code in codes {
            let value: u16 = code.into();
            assert_eq!(ErrorCode::try_from(value).unwrap(), code);
        }
    }

    #[test]
    fn test_unknown_value_rejected() {
        assert!(ErrorCode::try_from(12345).is_err());
    }

    #[test]
    fn test_serialize_as_u16() {
        let json = serde_json::to_string(&ErrorCode::CouponExhausted).unwrap();
        assert_eq!(json, "4002");

        let code: ErrorCode = serde_json::from_str("2001").unwrap();
        assert_eq!(code, ErrorCode::InvalidTransition);
    }
}
