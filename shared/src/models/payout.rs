//! Payout entity
//!
//! A seller's withdrawal request against their reconciled available balance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payout status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl PayoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Completed => "COMPLETED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }

    /// Statuses that count against a seller's available balance
    pub fn reserves_balance(&self) -> bool {
        matches!(self, Self::Approved | Self::Completed)
    }
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payout request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payout {
    /// Payout ID
    pub id: String,
    /// Requesting seller
    pub seller_id: String,
    /// Requested amount (minor units, > 0)
    pub amount: i64,
    /// Destination bank name
    pub bank: String,
    /// Destination account number
    pub account: String,
    /// Payout status
    pub status: PayoutStatus,
    /// Request timestamp
    pub requested_at: i64,
    /// Processing timestamp, set once status leaves Pending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<i64>,
}

impl Payout {
    /// Check the processing-timestamp invariant
    pub fn processing_consistent(&self) -> bool {
        (self.status == PayoutStatus::Pending) == self.processed_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_reservation() {
        assert!(!PayoutStatus::Pending.reserves_balance());
        assert!(PayoutStatus::Approved.reserves_balance());
        assert!(!PayoutStatus::Rejected.reserves_balance());
        assert!(PayoutStatus::Completed.reserves_balance());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!PayoutStatus::Pending.is_terminal());
        assert!(!PayoutStatus::Approved.is_terminal());
        assert!(PayoutStatus::Rejected.is_terminal());
        assert!(PayoutStatus::Completed.is_terminal());
    }
}
