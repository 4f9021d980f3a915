//! Payout command handlers
//!
//! Balance checks run against the reconciled balance at both request and
//! approval time. The request-time check rejects obviously impossible
//! withdrawals; the approval-time re-check, executed under the payout lock,
//! is what actually guarantees the balance never goes negative.

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata};
use crate::reconciler::{earned_net, reserved_amount};
use crate::validator::transitions::{ensure_admin, ensure_payout_transition, ensure_role};
use shared::models::{EntityKind, Payout, PayoutStatus};
use shared::util::{new_id, now_millis};
use shared::{AppError, AppResult, ErrorCode, EventType, LifecycleEvent, Role};

fn available_balance_for(ctx: &mut CommandContext<'_>, seller_id: &str) -> AppResult<i64> {
    let earned = earned_net(ctx.orders()?, seller_id);
    let reserved = reserved_amount(ctx.payouts()?, seller_id);
    Ok(earned - reserved)
}

/// RequestPayout action
#[derive(Debug, Clone)]
pub struct RequestPayoutAction {
    pub amount: i64,
    pub bank: String,
    pub account: String,
}

impl CommandHandler for RequestPayoutAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_role(meta.role, Role::Seller, "REQUEST_PAYOUT")?;

        let available = available_balance_for(ctx, &meta.actor_id)?;
        if self.amount > available {
            return Err(AppError::conflict(
                ErrorCode::InsufficientBalance,
                format!(
                    "Requested {} exceeds available balance {}",
                    self.amount, available
                ),
            ));
        }

        let payout = Payout {
            id: new_id(),
            seller_id: meta.actor_id.clone(),
            amount: self.amount,
            bank: self.bank.clone(),
            account: self.account.clone(),
            status: PayoutStatus::Pending,
            requested_at: now_millis(),
            processed_at: None,
        };

        let event = LifecycleEvent::created(
            EventType::PayoutRequested,
            EntityKind::Payout,
            payout.id.clone(),
            payout.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_payout(payout)?;
        Ok(vec![event])
    }
}

/// ApprovePayout action
#[derive(Debug, Clone)]
pub struct ApprovePayoutAction {
    pub payout_id: String,
}

impl CommandHandler for ApprovePayoutAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_admin(meta.role, "APPROVE_PAYOUT")?;
        let mut payout = ctx.payout(&self.payout_id)?;
        ensure_payout_transition(payout.status, PayoutStatus::Approved)?;

        // Re-check under the payout lock: approving must never drive the
        // seller's reconciled balance negative.
        let available = available_balance_for(ctx, &payout.seller_id)?;
        if payout.amount > available {
            return Err(AppError::conflict(
                ErrorCode::InsufficientBalance,
                format!(
                    "Approving {} would exceed available balance {}",
                    payout.amount, available
                ),
            ));
        }

        let previous = payout.status;
        payout.status = PayoutStatus::Approved;
        payout.processed_at = Some(now_millis());

        let event = LifecycleEvent::transition(
            EventType::PayoutApproved,
            EntityKind::Payout,
            payout.id.clone(),
            previous.as_str(),
            payout.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_payout(payout)?;
        Ok(vec![event])
    }
}

/// RejectPayout action
#[derive(Debug, Clone)]
pub struct RejectPayoutAction {
    pub payout_id: String,
    pub reason: Option<String>,
}

impl CommandHandler for RejectPayoutAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_admin(meta.role, "REJECT_PAYOUT")?;
        let mut payout = ctx.payout(&self.payout_id)?;
        ensure_payout_transition(payout.status, PayoutStatus::Rejected)?;

        let previous = payout.status;
        payout.status = PayoutStatus::Rejected;
        payout.processed_at = Some(now_millis());

        if let Some(reason) = &self.reason {
            tracing::info!(payout_id = %payout.id, reason = %reason, "Payout rejected");
        }

        let event = LifecycleEvent::transition(
            EventType::PayoutRejected,
            EntityKind::Payout,
            payout.id.clone(),
            previous.as_str(),
            payout.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_payout(payout)?;
        Ok(vec![event])
    }
}

/// CompletePayout action - the transfer has been executed
#[derive(Debug, Clone)]
pub struct CompletePayoutAction {
    pub payout_id: String,
}

impl CommandHandler for CompletePayoutAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_admin(meta.role, "COMPLETE_PAYOUT")?;
        let mut payout = ctx.payout(&self.payout_id)?;
        ensure_payout_transition(payout.status, PayoutStatus::Completed)?;

        let previous = payout.status;
        payout.status = PayoutStatus::Completed;

        let event = LifecycleEvent::transition(
            EventType::PayoutCompleted,
            EntityKind::Payout,
            payout.id.clone(),
            previous.as_str(),
            payout.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_payout(payout)?;
        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::store::LedgerStore;
    use shared::models::{Order, OrderStatus};

    fn test_meta(actor: &str, role: Role) -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor_id: actor.to_string(),
            role,
            timestamp: 1_700_000_000_000,
        }
    }

    fn completed_order(id: &str, seller: &str, net: i64) -> Order {
        Order {
            id: id.to_string(),
            buyer_id: "buyer-1".to_string(),
            seller_id: seller.to_string(),
            service_id: "svc-1".to_string(),
            gross_amount: net,
            discount_amount: 0,
            platform_fee_amount: 0,
            net_seller_amount: net,
            status: OrderStatus::Completed,
            coupon_code: None,
            delivery_count: 1,
            delivered_at: Some(1_700_000_000_000),
            created_at: 1_700_000_000_000,
            completed_at: Some(1_700_000_100_000),
        }
    }

    fn request(ctx: &mut CommandContext<'_>, seller: &str, amount: i64) -> AppResult<Payout> {
        let events = RequestPayoutAction {
            amount,
            bank: "Hana Bank".to_string(),
            account: "110-123-456789".to_string(),
        }
        .execute(ctx, &test_meta(seller, Role::Seller))?;
        ctx.payout(&events[0].entity_id)
    }

    #[test]
    fn test_request_within_balance() {
        let store = LedgerStore::open_in_memory().unwrap();
        store
            .write(&[completed_order("ord-1", "seller-1", 300_000)])
            .unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let payout = request(&mut ctx, "seller-1", 200_000).unwrap();
        assert_eq!(payout.status, PayoutStatus::Pending);
        assert!(payout.processed_at.is_none());
    }

    #[test]
    fn test_request_over_balance_conflicts() {
        let store = LedgerStore::open_in_memory().unwrap();
        store
            .write(&[completed_order("ord-1", "seller-1", 100_000)])
            .unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let err = request(&mut ctx, "seller-1", 100_001).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientBalance);
    }

    #[test]
    fn test_approve_then_full_balance_is_zero() {
        let store = LedgerStore::open_in_memory().unwrap();
        store
            .write(&[completed_order("ord-1", "seller-1", 300_000)])
            .unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let payout = request(&mut ctx, "seller-1", 300_000).unwrap();
        ApprovePayoutAction {
            payout_id: payout.id.clone(),
        }
        .execute(&mut ctx, &test_meta("admin-1", Role::Admin))
        .unwrap();

        assert_eq!(available_balance_for(&mut ctx, "seller-1").unwrap(), 0);

        // Any further positive request now conflicts
        let err = request(&mut ctx, "seller-1", 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientBalance);
    }

    #[test]
    fn test_second_approval_over_balance_conflicts() {
        let store = LedgerStore::open_in_memory().unwrap();
        store
            .write(&[completed_order("ord-1", "seller-1", 100_000)])
            .unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        // Two pending requests whose sum exceeds the balance
        let first = request(&mut ctx, "seller-1", 80_000).unwrap();
        let second = request(&mut ctx, "seller-1", 80_000).unwrap();

        ApprovePayoutAction {
            payout_id: first.id.clone(),
        }
        .execute(&mut ctx, &test_meta("admin-1", Role::Admin))
        .unwrap();

        let err = ApprovePayoutAction {
            payout_id: second.id.clone(),
        }
        .execute(&mut ctx, &test_meta("admin-1", Role::Admin))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientBalance);

        // The losing payout is untouched
        assert_eq!(ctx.payout(&second.id).unwrap().status, PayoutStatus::Pending);
    }

    #[test]
    fn test_approve_rejected_payout_fails_unchanged() {
        let store = LedgerStore::open_in_memory().unwrap();
        store
            .write(&[completed_order("ord-1", "seller-1", 100_000)])
            .unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let payout = request(&mut ctx, "seller-1", 50_000).unwrap();
        RejectPayoutAction {
            payout_id: payout.id.clone(),
            reason: Some("bank details mismatch".to_string()),
        }
        .execute(&mut ctx, &test_meta("admin-1", Role::Admin))
        .unwrap();

        let err = ApprovePayoutAction {
            payout_id: payout.id.clone(),
        }
        .execute(&mut ctx, &test_meta("admin-1", Role::Admin))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::TerminalState);
        assert_eq!(
            ctx.payout(&payout.id).unwrap().status,
            PayoutStatus::Rejected
        );
    }

    #[test]
    fn test_complete_approved_payout() {
        let store = LedgerStore::open_in_memory().unwrap();
        store
            .write(&[completed_order("ord-1", "seller-1", 100_000)])
            .unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let payout = request(&mut ctx, "seller-1", 50_000).unwrap();
        ApprovePayoutAction {
            payout_id: payout.id.clone(),
        }
        .execute(&mut ctx, &test_meta("admin-1", Role::Admin))
        .unwrap();
        CompletePayoutAction {
            payout_id: payout.id.clone(),
        }
        .execute(&mut ctx, &test_meta("admin-1", Role::Admin))
        .unwrap();

        let completed = ctx.payout(&payout.id).unwrap();
        assert_eq!(completed.status, PayoutStatus::Completed);
        assert!(completed.processing_consistent());
        // Completed payouts still reserve balance
        assert_eq!(available_balance_for(&mut ctx, "seller-1").unwrap(), 50_000);
    }

    #[test]
    fn test_approval_requires_admin() {
        let store = LedgerStore::open_in_memory().unwrap();
        store
            .write(&[completed_order("ord-1", "seller-1", 100_000)])
            .unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let payout = request(&mut ctx, "seller-1", 50_000).unwrap();
        let err = ApprovePayoutAction {
            payout_id: payout.id.clone(),
        }
        .execute(&mut ctx, &test_meta("seller-1", Role::Seller))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleRequired);
    }

    #[test]
    fn test_only_completed_orders_fund_balance() {
        let store = LedgerStore::open_in_memory().unwrap();
        let mut pending = completed_order("ord-1", "seller-1", 100_000);
        pending.status = OrderStatus::InProgress;
        pending.completed_at = None;
        store.write(&[pending]).unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let err = request(&mut ctx, "seller-1", 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientBalance);
    }
}
