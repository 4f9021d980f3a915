//! Review entity
//!
//! Exactly one review may exist per completed order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Review visibility status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    #[default]
    Visible,
    Hidden,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visible => "VISIBLE",
            Self::Hidden => "HIDDEN",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A buyer's review of a completed order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    /// Review ID
    pub id: String,
    /// Reviewed order
    pub order_id: String,
    /// Reviewing buyer (copied from the order)
    pub buyer_id: String,
    /// Reviewed seller (copied from the order)
    pub seller_id: String,
    /// Star rating, 1-5
    pub rating: u8,
    /// Review text
    pub comment: String,
    /// Visibility status
    pub status: ReviewStatus,
    /// Seller's reply, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    /// Creation timestamp
    pub created_at: i64,
}
