//! Proposal entity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Proposal status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalStatus {
    #[default]
    Sent,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "SENT",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Withdrawn => "WITHDRAWN",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Sent)
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A seller's bid on a project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Proposal {
    /// Proposal ID
    pub id: String,
    /// Target project
    pub project_id: String,
    /// Bidding seller
    pub expert_id: String,
    /// Offered price (minor units, > 0)
    pub price: i64,
    /// Promised delivery time in days (>= 1)
    pub delivery_days: u32,
    /// Proposal status
    pub status: ProposalStatus,
    /// Creation timestamp
    pub created_at: i64,
}
