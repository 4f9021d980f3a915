//! Command payload validation
//!
//! Centralized text length constants and field constraint checks. Length
//! limits match what the admin/buyer/seller surfaces render comfortably;
//! the store itself enforces nothing.

use shared::models::CouponKind;
use shared::{AppError, AppResult, CommandPayload};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names and subjects: ticket subject, project title, bank name
pub const MAX_NAME_LEN: usize = 200;

/// Notes, reasons, review comments, replies
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: coupon codes, account numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: Option<&str>, field: &str, max_len: usize) -> AppResult<()> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate that a monetary amount is strictly positive.
pub fn validate_positive_amount(amount: i64, field: &str) -> AppResult<()> {
    if amount <= 0 {
        return Err(AppError::validation(format!(
            "{field} must be positive, got {amount}"
        )));
    }
    Ok(())
}

/// Check every field constraint of a command payload.
///
/// Runs before any state is read; contextual checks (ownership, status,
/// balance) belong to the actions.
pub fn validate_payload(payload: &CommandPayload) -> AppResult<()> {
    match payload {
        CommandPayload::CreateOrder {
            seller_id,
            service_id,
            gross_amount,
            coupon_code,
        } => {
            validate_required_text(seller_id, "seller_id", MAX_SHORT_TEXT_LEN)?;
            validate_required_text(service_id, "service_id", MAX_SHORT_TEXT_LEN)?;
            validate_positive_amount(*gross_amount, "gross_amount")?;
            validate_optional_text(coupon_code.as_deref(), "coupon_code", MAX_SHORT_TEXT_LEN)
        }
        CommandPayload::CancelOrder { reason, .. } => {
            validate_optional_text(reason.as_deref(), "reason", MAX_NOTE_LEN)
        }
        CommandPayload::RequestPayout {
            amount,
            bank,
            account,
        } => {
            validate_positive_amount(*amount, "amount")?;
            validate_required_text(bank, "bank", MAX_NAME_LEN)?;
            validate_required_text(account, "account", MAX_SHORT_TEXT_LEN)
        }
        CommandPayload::RejectPayout { reason, .. } => {
            validate_optional_text(reason.as_deref(), "reason", MAX_NOTE_LEN)
        }
        CommandPayload::OpenDispute { amount, .. } => {
            if let Some(amount) = amount {
                validate_positive_amount(*amount, "amount")?;
            }
            Ok(())
        }
        CommandPayload::ResolveDispute {
            resolution_note, ..
        } => validate_optional_text(resolution_note.as_deref(), "resolution_note", MAX_NOTE_LEN),
        CommandPayload::FileReport {
            target_id, reason, ..
        } => {
            validate_required_text(target_id, "target_id", MAX_SHORT_TEXT_LEN)?;
            validate_required_text(reason, "reason", MAX_NOTE_LEN)
        }
        CommandPayload::OpenTicket { subject, .. } => {
            validate_required_text(subject, "subject", MAX_NAME_LEN)
        }
        CommandPayload::AssignTicket { assignee, .. } => {
            validate_required_text(assignee, "assignee", MAX_SHORT_TEXT_LEN)
        }
        CommandPayload::PostProject {
            title,
            budget_amount,
        } => {
            validate_required_text(title, "title", MAX_NAME_LEN)?;
            validate_positive_amount(*budget_amount, "budget_amount")
        }
        CommandPayload::SubmitProposal {
            price,
            delivery_days,
            ..
        } => {
            validate_positive_amount(*price, "price")?;
            if *delivery_days < 1 {
                return Err(AppError::validation("delivery_days must be at least 1"));
            }
            Ok(())
        }
        CommandPayload::SubmitReview {
            rating, comment, ..
        } => {
            if !(1..=5).contains(rating) {
                return Err(AppError::validation(format!(
                    "rating must be 1-5, got {rating}"
                )));
            }
            validate_required_text(comment, "comment", MAX_NOTE_LEN)
        }
        CommandPayload::ReplyReview { reply, .. } => {
            validate_required_text(reply, "reply", MAX_NOTE_LEN)
        }
        CommandPayload::CreateCoupon {
            code,
            kind,
            value,
            usage_limit,
            ..
        } => {
            validate_required_text(code, "code", MAX_SHORT_TEXT_LEN)?;
            validate_positive_amount(*value, "value")?;
            if *kind == CouponKind::Percentage && *value > 100 {
                return Err(AppError::validation(format!(
                    "percentage coupon value must be <= 100, got {value}"
                )));
            }
            if *usage_limit == 0 {
                return Err(AppError::validation("usage_limit must be at least 1"));
            }
            Ok(())
        }
        // Id-only payloads carry nothing to range-check
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("hello", "field", 10).is_ok());
        assert!(validate_required_text("", "field", 10).is_err());
        assert!(validate_required_text("   ", "field", 10).is_err());
        assert!(validate_required_text("toolongvalue", "field", 5).is_err());
    }

    #[test]
    fn test_positive_amount() {
        assert!(validate_positive_amount(1, "amount").is_ok());
        assert!(validate_positive_amount(0, "amount").is_err());
        assert!(validate_positive_amount(-5, "amount").is_err());
    }

    #[test]
    fn test_create_order_payload() {
        let ok = CommandPayload::CreateOrder {
            seller_id: "seller-1".to_string(),
            service_id: "svc-1".to_string(),
            gross_amount: 250_000,
            coupon_code: None,
        };
        assert!(validate_payload(&ok).is_ok());

        let negative = CommandPayload::CreateOrder {
            seller_id: "seller-1".to_string(),
            service_id: "svc-1".to_string(),
            gross_amount: -1,
            coupon_code: None,
        };
        assert!(validate_payload(&negative).is_err());
    }

    #[test]
    fn test_review_rating_bounds() {
        for (rating, ok) in [(0u8, false), (1, true), (5, true), (6, false)] {
            let payload = CommandPayload::SubmitReview {
                order_id: "ord-1".to_string(),
                rating,
                comment: "great work".to_string(),
            };
            assert_eq!(validate_payload(&payload).is_ok(), ok, "rating {rating}");
        }
    }

    #[test]
    fn test_percentage_coupon_capped_at_100() {
        let payload = CommandPayload::CreateCoupon {
            code: "BIG".to_string(),
            kind: CouponKind::Percentage,
            value: 120,
            usage_limit: 10,
            expires_at: 2_000_000_000_000,
        };
        assert!(validate_payload(&payload).is_err());

        let payload = CommandPayload::CreateCoupon {
            code: "BIG".to_string(),
            kind: CouponKind::Amount,
            value: 120,
            usage_limit: 10,
            expires_at: 2_000_000_000_000,
        };
        assert!(validate_payload(&payload).is_ok());
    }

    #[test]
    fn test_proposal_delivery_days() {
        let payload = CommandPayload::SubmitProposal {
            project_id: "proj-1".to_string(),
            price: 500_000,
            delivery_days: 0,
        };
        assert!(validate_payload(&payload).is_err());
    }
}
