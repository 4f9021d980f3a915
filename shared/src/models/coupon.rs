//! Coupon entity
//!
//! Coupons are keyed by their unique code. Orders reference coupons by code
//! only; existence is checked at redemption time.

use serde::{Deserialize, Serialize};

/// Discount kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CouponKind {
    /// `value` is a percentage, 1-100
    Percentage,
    /// `value` is a fixed amount in minor units
    Amount,
}

/// A discount coupon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coupon {
    /// Unique coupon code
    pub code: String,
    /// Discount kind
    pub kind: CouponKind,
    /// Discount value; percentage (<= 100) or fixed amount, always > 0
    pub value: i64,
    /// Maximum number of redemptions
    pub usage_limit: u32,
    /// Redemptions so far; never exceeds `usage_limit`
    #[serde(default)]
    pub used_count: u32,
    /// Expiry timestamp (millis); unusable once in the past
    pub expires_at: i64,
    /// Whether the coupon is currently redeemable
    pub active: bool,
    /// Creation timestamp
    pub created_at: i64,
}

impl Coupon {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at < now
    }

    pub fn is_exhausted(&self) -> bool {
        self.used_count >= self.usage_limit
    }

    /// Usage-counter invariant
    pub fn usage_consistent(&self) -> bool {
        self.used_count <= self.usage_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_coupon() -> Coupon {
        Coupon {
            code: "SAVE10".to_string(),
            kind: CouponKind::Percentage,
            value: 10,
            usage_limit: 5,
            used_count: 0,
            expires_at: 2_000_000_000_000,
            active: true,
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_expiry() {
        let coupon = sample_coupon();
        assert!(!coupon.is_expired(1_999_999_999_999));
        assert!(coupon.is_expired(2_000_000_000_001));
    }

    #[test]
    fn test_exhaustion() {
        let mut coupon = sample_coupon();
        assert!(!coupon.is_exhausted());
        coupon.used_count = 5;
        assert!(coupon.is_exhausted());
        assert!(coupon.usage_consistent());
        coupon.used_count = 6;
        assert!(!coupon.usage_consistent());
    }
}
