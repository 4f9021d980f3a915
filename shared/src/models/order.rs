//! Order entity
//!
//! An order is the purchase of a service by a buyer from a seller. Monetary
//! fields are integer minor currency units; the derived amounts always satisfy
//! `net_seller_amount = gross_amount - discount_amount - platform_fee_amount`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Terminal statuses admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A service order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Order ID (assigned by the engine)
    pub id: String,
    /// Buyer user ID
    pub buyer_id: String,
    /// Seller user ID
    pub seller_id: String,
    /// Purchased service ID
    pub service_id: String,
    /// Gross amount before discount and fees
    pub gross_amount: i64,
    /// Discount applied at creation (coupon)
    pub discount_amount: i64,
    /// Platform fee withheld from the seller
    pub platform_fee_amount: i64,
    /// Amount credited to the seller on completion
    pub net_seller_amount: i64,
    /// Order status
    pub status: OrderStatus,
    /// Redeemed coupon code, if any (weak reference, checked at redemption)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    /// Number of deliveries the seller has made
    #[serde(default)]
    pub delivery_count: u32,
    /// Timestamp of the delivery currently awaiting buyer approval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<i64>,
    /// Creation timestamp
    pub created_at: i64,
    /// Completion timestamp, set iff status is Completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

impl Order {
    /// Check the derived-amount invariant
    pub fn amounts_consistent(&self) -> bool {
        self.net_seller_amount
            == self.gross_amount - self.discount_amount - self.platform_fee_amount
    }

    /// Check the completion-timestamp invariant
    pub fn completion_consistent(&self) -> bool {
        (self.status == OrderStatus::Completed) == self.completed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order {
            id: "ord-1".to_string(),
            buyer_id: "buyer-1".to_string(),
            seller_id: "seller-1".to_string(),
            service_id: "svc-1".to_string(),
            gross_amount: 250_000,
            discount_amount: 25_000,
            platform_fee_amount: 22_500,
            net_seller_amount: 202_500,
            status: OrderStatus::Pending,
            coupon_code: Some("SAVE10".to_string()),
            delivery_count: 0,
            delivered_at: None,
            created_at: 1_700_000_000_000,
            completed_at: None,
        }
    }

    #[test]
    fn test_amounts_consistent() {
        let order = sample_order();
        assert!(order.amounts_consistent());

        let mut broken = order;
        broken.net_seller_amount += 1;
        assert!(!broken.amounts_consistent());
    }

    #[test]
    fn test_completion_consistent() {
        let mut order = sample_order();
        assert!(order.completion_consistent());

        order.status = OrderStatus::Completed;
        assert!(!order.completion_consistent());

        order.completed_at = Some(1_700_000_100_000);
        assert!(order.completion_consistent());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::InProgress.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&OrderStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }
}
