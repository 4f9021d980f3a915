//! Order command handlers
//!
//! CreateOrder computes the derived amounts (discount, platform fee, net)
//! once at creation; later transitions only move status and timestamps, so
//! the amount invariant can never drift.

use crate::coupon;
use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata};
use crate::validator::transitions::{ensure_order_transition, ensure_role};
use shared::models::{EntityKind, Order, OrderStatus};
use shared::util::{new_id, now_millis};
use shared::{AppError, AppResult, ErrorCode, EventType, LifecycleEvent, Role};

/// CreateOrder action
#[derive(Debug, Clone)]
pub struct CreateOrderAction {
    pub seller_id: String,
    pub service_id: String,
    pub gross_amount: i64,
    pub coupon_code: Option<String>,
}

impl CommandHandler for CreateOrderAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_role(meta.role, Role::Buyer, "CREATE_ORDER")?;

        let now = now_millis();

        // Redeem the coupon, if any. The usage increment is staged here and
        // committed together with the order (coupon collection first).
        let discount_amount = match &self.coupon_code {
            Some(code) => {
                let mut redeemed = ctx.coupon(code)?;
                coupon::validate_coupon(&redeemed, now)?;
                let discount = coupon::compute_discount(&redeemed, self.gross_amount);
                redeemed.used_count += 1;
                ctx.put_coupon(redeemed)?;
                ctx.mark_coupon_redeemed(code.clone());
                discount
            }
            None => 0,
        };

        let platform_fee_amount =
            (self.gross_amount - discount_amount) * ctx.config().platform_fee_percent / 100;
        let net_seller_amount = self.gross_amount - discount_amount - platform_fee_amount;

        let order = Order {
            id: new_id(),
            buyer_id: meta.actor_id.clone(),
            seller_id: self.seller_id.clone(),
            service_id: self.service_id.clone(),
            gross_amount: self.gross_amount,
            discount_amount,
            platform_fee_amount,
            net_seller_amount,
            status: OrderStatus::Pending,
            coupon_code: self.coupon_code.clone(),
            delivery_count: 0,
            delivered_at: None,
            created_at: now,
            completed_at: None,
        };

        let event = LifecycleEvent::created(
            EventType::OrderCreated,
            EntityKind::Order,
            order.id.clone(),
            order.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_order(order)?;
        Ok(vec![event])
    }
}

/// AcceptOrder action - the seller starts work
#[derive(Debug, Clone)]
pub struct AcceptOrderAction {
    pub order_id: String,
}

impl CommandHandler for AcceptOrderAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_role(meta.role, Role::Seller, "ACCEPT_ORDER")?;
        let mut order = ctx.order(&self.order_id)?;
        crate::validator::ensure_owner(&meta.actor_id, &order.seller_id, "order's seller")?;
        ensure_order_transition(order.status, OrderStatus::InProgress)?;

        let previous = order.status;
        order.status = OrderStatus::InProgress;

        let event = LifecycleEvent::transition(
            EventType::OrderAccepted,
            EntityKind::Order,
            order.id.clone(),
            previous.as_str(),
            order.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_order(order)?;
        Ok(vec![event])
    }
}

/// DeliverOrder action - the seller submits work for approval
#[derive(Debug, Clone)]
pub struct DeliverOrderAction {
    pub order_id: String,
}

impl CommandHandler for DeliverOrderAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_role(meta.role, Role::Seller, "DELIVER_ORDER")?;
        let mut order = ctx.order(&self.order_id)?;
        crate::validator::ensure_owner(&meta.actor_id, &order.seller_id, "order's seller")?;

        if order.status != OrderStatus::InProgress {
            let code = if order.status.is_terminal() {
                ErrorCode::TerminalState
            } else {
                ErrorCode::InvalidTransition
            };
            return Err(AppError::with_message(
                code,
                format!("Cannot deliver order in {} status", order.status),
            ));
        }

        order.delivered_at = Some(now_millis());
        order.delivery_count += 1;

        let event = LifecycleEvent::transition(
            EventType::OrderDelivered,
            EntityKind::Order,
            order.id.clone(),
            order.status.as_str(),
            order.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_order(order)?;
        Ok(vec![event])
    }
}

/// ApproveDelivery action - the buyer accepts the delivery, completing the order
#[derive(Debug, Clone)]
pub struct ApproveDeliveryAction {
    pub order_id: String,
}

impl CommandHandler for ApproveDeliveryAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_role(meta.role, Role::Buyer, "APPROVE_DELIVERY")?;
        let mut order = ctx.order(&self.order_id)?;
        crate::validator::ensure_owner(&meta.actor_id, &order.buyer_id, "order's buyer")?;
        ensure_order_transition(order.status, OrderStatus::Completed)?;

        if order.delivered_at.is_none() {
            return Err(AppError::with_message(
                ErrorCode::DeliveryRequired,
                format!("Order {} has no delivery awaiting approval", order.id),
            ));
        }

        let previous = order.status;
        order.status = OrderStatus::Completed;
        order.completed_at = Some(now_millis());

        let event = LifecycleEvent::transition(
            EventType::OrderCompleted,
            EntityKind::Order,
            order.id.clone(),
            previous.as_str(),
            order.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_order(order)?;
        Ok(vec![event])
    }
}

/// RequestRevision action - the buyer sends the delivery back
#[derive(Debug, Clone)]
pub struct RequestRevisionAction {
    pub order_id: String,
}

impl CommandHandler for RequestRevisionAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_role(meta.role, Role::Buyer, "REQUEST_REVISION")?;
        let mut order = ctx.order(&self.order_id)?;
        crate::validator::ensure_owner(&meta.actor_id, &order.buyer_id, "order's buyer")?;

        if order.status != OrderStatus::InProgress {
            return Err(AppError::transition(format!(
                "Cannot request a revision on order in {} status",
                order.status
            )));
        }
        if order.delivered_at.is_none() {
            return Err(AppError::with_message(
                ErrorCode::DeliveryRequired,
                format!("Order {} has no delivery to revise", order.id),
            ));
        }

        // The order stays in progress; only the pending delivery is cleared.
        // delivery_count keeps the full history of deliveries made.
        order.delivered_at = None;

        let event = LifecycleEvent::transition(
            EventType::RevisionRequested,
            EntityKind::Order,
            order.id.clone(),
            order.status.as_str(),
            order.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_order(order)?;
        Ok(vec![event])
    }
}

/// CancelOrder action
#[derive(Debug, Clone)]
pub struct CancelOrderAction {
    pub order_id: String,
    pub reason: Option<String>,
}

impl CommandHandler for CancelOrderAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        let mut order = ctx.order(&self.order_id)?;
        match meta.role {
            Role::Admin => {}
            Role::Buyer => {
                crate::validator::ensure_owner(&meta.actor_id, &order.buyer_id, "order's buyer")?
            }
            Role::Seller => {
                return Err(AppError::forbidden(
                    "Sellers cannot cancel orders; open a dispute instead",
                ));
            }
        }
        ensure_order_transition(order.status, OrderStatus::Cancelled)?;

        let previous = order.status;
        order.status = OrderStatus::Cancelled;

        if let Some(reason) = &self.reason {
            tracing::info!(order_id = %order.id, reason = %reason, "Order cancelled");
        }

        let event = LifecycleEvent::transition(
            EventType::OrderCancelled,
            EntityKind::Order,
            order.id.clone(),
            previous.as_str(),
            order.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_order(order)?;
        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::store::LedgerStore;
    use shared::models::{Coupon, CouponKind};

    fn test_meta(actor: &str, role: Role) -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor_id: actor.to_string(),
            role,
            timestamp: 1_700_000_000_000,
        }
    }

    fn seed_coupon(store: &LedgerStore, code: &str, value: i64, usage_limit: u32) {
        store
            .write(&[Coupon {
                code: code.to_string(),
                kind: CouponKind::Percentage,
                value,
                usage_limit,
                used_count: 0,
                expires_at: i64::MAX,
                active: true,
                created_at: 1_700_000_000_000,
            }])
            .unwrap();
    }

    fn create_order(
        ctx: &mut CommandContext<'_>,
        buyer: &str,
        gross: i64,
        coupon: Option<&str>,
    ) -> Order {
        let action = CreateOrderAction {
            seller_id: "seller-1".to_string(),
            service_id: "svc-1".to_string(),
            gross_amount: gross,
            coupon_code: coupon.map(str::to_string),
        };
        let events = action
            .execute(ctx, &test_meta(buyer, Role::Buyer))
            .unwrap();
        ctx.order(&events[0].entity_id).unwrap()
    }

    #[test]
    fn test_create_order_computes_amounts() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let order = create_order(&mut ctx, "buyer-1", 250_000, None);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.discount_amount, 0);
        assert_eq!(order.platform_fee_amount, 25_000);
        assert_eq!(order.net_seller_amount, 225_000);
        assert!(order.amounts_consistent());
    }

    #[test]
    fn test_create_order_with_percentage_coupon() {
        let store = LedgerStore::open_in_memory().unwrap();
        seed_coupon(&store, "SAVE10", 10, 5);
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let order = create_order(&mut ctx, "buyer-1", 250_000, Some("SAVE10"));
        assert_eq!(order.discount_amount, 25_000);
        // Fee applies to the discounted amount: 10% of 225,000
        assert_eq!(order.platform_fee_amount, 22_500);
        assert_eq!(order.net_seller_amount, 202_500);
        assert!(order.amounts_consistent());

        // Usage counter staged
        assert_eq!(ctx.coupon("SAVE10").unwrap().used_count, 1);
    }

    #[test]
    fn test_create_order_with_unknown_coupon() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let action = CreateOrderAction {
            seller_id: "seller-1".to_string(),
            service_id: "svc-1".to_string(),
            gross_amount: 100_000,
            coupon_code: Some("NOPE".to_string()),
        };
        let err = action
            .execute(&mut ctx, &test_meta("buyer-1", Role::Buyer))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CouponNotFound);
    }

    #[test]
    fn test_create_order_requires_buyer_role() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let action = CreateOrderAction {
            seller_id: "seller-1".to_string(),
            service_id: "svc-1".to_string(),
            gross_amount: 100_000,
            coupon_code: None,
        };
        let err = action
            .execute(&mut ctx, &test_meta("seller-1", Role::Seller))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleRequired);
    }

    #[test]
    fn test_full_delivery_cycle() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);
        let order = create_order(&mut ctx, "buyer-1", 100_000, None);

        AcceptOrderAction {
            order_id: order.id.clone(),
        }
        .execute(&mut ctx, &test_meta("seller-1", Role::Seller))
        .unwrap();

        DeliverOrderAction {
            order_id: order.id.clone(),
        }
        .execute(&mut ctx, &test_meta("seller-1", Role::Seller))
        .unwrap();

        let delivered = ctx.order(&order.id).unwrap();
        assert_eq!(delivered.delivery_count, 1);
        assert!(delivered.delivered_at.is_some());

        let events = ApproveDeliveryAction {
            order_id: order.id.clone(),
        }
        .execute(&mut ctx, &test_meta("buyer-1", Role::Buyer))
        .unwrap();

        assert_eq!(events[0].event_type, EventType::OrderCompleted);
        let completed = ctx.order(&order.id).unwrap();
        assert_eq!(completed.status, OrderStatus::Completed);
        assert!(completed.completed_at.is_some());
        assert!(completed.completion_consistent());
    }

    #[test]
    fn test_approve_delivery_without_delivery_fails() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);
        let order = create_order(&mut ctx, "buyer-1", 100_000, None);

        AcceptOrderAction {
            order_id: order.id.clone(),
        }
        .execute(&mut ctx, &test_meta("seller-1", Role::Seller))
        .unwrap();

        let err = ApproveDeliveryAction {
            order_id: order.id.clone(),
        }
        .execute(&mut ctx, &test_meta("buyer-1", Role::Buyer))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::DeliveryRequired);
    }

    #[test]
    fn test_revision_clears_delivery_but_keeps_count() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);
        let order = create_order(&mut ctx, "buyer-1", 100_000, None);

        AcceptOrderAction {
            order_id: order.id.clone(),
        }
        .execute(&mut ctx, &test_meta("seller-1", Role::Seller))
        .unwrap();
        DeliverOrderAction {
            order_id: order.id.clone(),
        }
        .execute(&mut ctx, &test_meta("seller-1", Role::Seller))
        .unwrap();

        RequestRevisionAction {
            order_id: order.id.clone(),
        }
        .execute(&mut ctx, &test_meta("buyer-1", Role::Buyer))
        .unwrap();

        let revised = ctx.order(&order.id).unwrap();
        assert_eq!(revised.status, OrderStatus::InProgress);
        assert!(revised.delivered_at.is_none());
        assert_eq!(revised.delivery_count, 1);

        // Second delivery then approval completes with count 2
        DeliverOrderAction {
            order_id: order.id.clone(),
        }
        .execute(&mut ctx, &test_meta("seller-1", Role::Seller))
        .unwrap();
        ApproveDeliveryAction {
            order_id: order.id.clone(),
        }
        .execute(&mut ctx, &test_meta("buyer-1", Role::Buyer))
        .unwrap();
        assert_eq!(ctx.order(&order.id).unwrap().delivery_count, 2);
    }

    #[test]
    fn test_cancel_completed_order_fails() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);
        let order = create_order(&mut ctx, "buyer-1", 100_000, None);

        AcceptOrderAction {
            order_id: order.id.clone(),
        }
        .execute(&mut ctx, &test_meta("seller-1", Role::Seller))
        .unwrap();
        DeliverOrderAction {
            order_id: order.id.clone(),
        }
        .execute(&mut ctx, &test_meta("seller-1", Role::Seller))
        .unwrap();
        ApproveDeliveryAction {
            order_id: order.id.clone(),
        }
        .execute(&mut ctx, &test_meta("buyer-1", Role::Buyer))
        .unwrap();

        let err = CancelOrderAction {
            order_id: order.id.clone(),
            reason: None,
        }
        .execute(&mut ctx, &test_meta("buyer-1", Role::Buyer))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::TerminalState);
        // Unchanged
        assert_eq!(ctx.order(&order.id).unwrap().status, OrderStatus::Completed);
    }

    #[test]
    fn test_seller_cannot_cancel() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);
        let order = create_order(&mut ctx, "buyer-1", 100_000, None);

        let err = CancelOrderAction {
            order_id: order.id.clone(),
            reason: None,
        }
        .execute(&mut ctx, &test_meta("seller-1", Role::Seller))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn test_foreign_buyer_cannot_approve() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);
        let order = create_order(&mut ctx, "buyer-1", 100_000, None);

        AcceptOrderAction {
            order_id: order.id.clone(),
        }
        .execute(&mut ctx, &test_meta("seller-1", Role::Seller))
        .unwrap();
        DeliverOrderAction {
            order_id: order.id.clone(),
        }
        .execute(&mut ctx, &test_meta("seller-1", Role::Seller))
        .unwrap();

        let err = ApproveDeliveryAction {
            order_id: order.id.clone(),
        }
        .execute(&mut ctx, &test_meta("buyer-2", Role::Buyer))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotOwner);
    }

    #[test]
    fn test_full_discount_coupon_yields_zero_net() {
        let store = LedgerStore::open_in_memory().unwrap();
        store
            .write(&[Coupon {
                code: "FREE".to_string(),
                kind: CouponKind::Percentage,
                value: 100,
                usage_limit: 1,
                used_count: 0,
                expires_at: i64::MAX,
                active: true,
                created_at: 1_700_000_000_000,
            }])
            .unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let order = create_order(&mut ctx, "buyer-1", 50_000, Some("FREE"));
        assert_eq!(order.discount_amount, 50_000);
        assert_eq!(order.platform_fee_amount, 0);
        assert_eq!(order.net_seller_amount, 0);
    }
}
