//! Coupon validity and discount math
//!
//! Pure functions; the redemption itself (usage counter increment committed
//! together with order creation, with a compensating rollback) is handled by
//! the lifecycle engine's persist step.

use shared::models::{Coupon, CouponKind};
use shared::{AppError, AppResult, ErrorCode};

/// Check that a coupon can be redeemed right now.
///
/// Order of checks matters for the error a caller sees: an inactive coupon
/// reports inactive even when it is also expired.
pub fn validate_coupon(coupon: &Coupon, now: i64) -> AppResult<()> {
    if !coupon.active {
        return Err(AppError::conflict(
            ErrorCode::CouponInactive,
            format!("Coupon {} is not active", coupon.code),
        ));
    }
    if coupon.is_expired(now) {
        return Err(AppError::conflict(
            ErrorCode::CouponExpired,
            format!("Coupon {} expired", coupon.code),
        ));
    }
    if coupon.is_exhausted() {
        return Err(AppError::conflict(
            ErrorCode::CouponExhausted,
            format!("Coupon {} usage limit reached", coupon.code),
        ));
    }
    Ok(())
}

/// Compute the discount a coupon grants on a gross amount.
///
/// Percentage coupons floor; amount coupons cap at the gross amount so the
/// discounted total can never go negative.
pub fn compute_discount(coupon: &Coupon, gross_amount: i64) -> i64 {
    match coupon.kind {
        CouponKind::Percentage => gross_amount * coupon.value / 100,
        CouponKind::Amount => coupon.value.min(gross_amount),
    }
}
