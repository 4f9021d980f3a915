//! Dispute entity
//!
//! Disputes reference an order but never mutate it; order changes flow
//! through the lifecycle engine only.

use super::Priority;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dispute status; strictly monotonic Open -> Resolved -> Closed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeStatus {
    #[default]
    Open,
    Resolved,
    Closed,
}

impl DisputeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispute reason (preset options)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeReason {
    /// Seller did not deliver
    NonDelivery,
    /// Quality problems with the delivered work
    QualityIssue,
    /// Delivered past the agreed deadline
    LateDelivery,
    /// Other
    Other,
}

/// A dispute raised against an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dispute {
    /// Dispute ID
    pub id: String,
    /// Disputed order
    pub order_id: String,
    /// Buyer side (copied from the order)
    pub buyer_id: String,
    /// Seller side (copied from the order)
    pub seller_id: String,
    /// Dispute reason
    pub reason_code: DisputeReason,
    /// Disputed amount (defaults to the order's gross amount)
    pub amount: i64,
    /// Dispute status
    pub status: DisputeStatus,
    /// Priority
    pub priority: Priority,
    /// Creation timestamp
    pub created_at: i64,
    /// Admin's resolution note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_note: Option<String>,
}
