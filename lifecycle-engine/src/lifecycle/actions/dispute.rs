//! Dispute command handlers
//!
//! Disputes are opened by one of the order's parties and then moderated by
//! admins. They hold a back-reference to the order but never mutate it.

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata};
use crate::validator::transitions::{ensure_admin, ensure_dispute_transition};
use shared::models::{Dispute, DisputeReason, DisputeStatus, EntityKind, OrderStatus, Priority};
use shared::util::{new_id, now_millis};
use shared::{AppError, AppResult, ErrorCode, EventType, LifecycleEvent, Role};

/// OpenDispute action
#[derive(Debug, Clone)]
pub struct OpenDisputeAction {
    pub order_id: String,
    pub reason: DisputeReason,
    pub priority: Priority,
    pub amount: Option<i64>,
}

impl CommandHandler for OpenDisputeAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        if meta.role == Role::Admin {
            return Err(AppError::forbidden(
                "Only the order's parties may open a dispute",
            ));
        }

        let order = ctx.order(&self.order_id)?;
        if meta.actor_id != order.buyer_id && meta.actor_id != order.seller_id {
            return Err(AppError::not_owner(format!(
                "Actor {} is not a party to order {}",
                meta.actor_id, order.id
            )));
        }

        if !matches!(
            order.status,
            OrderStatus::InProgress | OrderStatus::Completed
        ) {
            return Err(AppError::conflict(
                ErrorCode::OrderNotDisputable,
                format!("Cannot open a dispute on order in {} status", order.status),
            ));
        }

        let dispute = Dispute {
            id: new_id(),
            order_id: order.id.clone(),
            buyer_id: order.buyer_id.clone(),
            seller_id: order.seller_id.clone(),
            reason_code: self.reason,
            amount: self.amount.unwrap_or(order.gross_amount),
            status: DisputeStatus::Open,
            priority: self.priority,
            created_at: now_millis(),
            resolution_note: None,
        };

        let event = LifecycleEvent::created(
            EventType::DisputeOpened,
            EntityKind::Dispute,
            dispute.id.clone(),
            dispute.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_dispute(dispute)?;
        Ok(vec![event])
    }
}

/// ResolveDispute action
#[derive(Debug, Clone)]
pub struct ResolveDisputeAction {
    pub dispute_id: String,
    pub resolution_note: Option<String>,
}

impl CommandHandler for ResolveDisputeAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_admin(meta.role, "RESOLVE_DISPUTE")?;
        let mut dispute = ctx.dispute(&self.dispute_id)?;
        ensure_dispute_transition(dispute.status, DisputeStatus::Resolved)?;

        let previous = dispute.status;
        dispute.status = DisputeStatus::Resolved;
        dispute.resolution_note = self.resolution_note.clone();

        let event = LifecycleEvent::transition(
            EventType::DisputeResolved,
            EntityKind::Dispute,
            dispute.id.clone(),
            previous.as_str(),
            dispute.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_dispute(dispute)?;
        Ok(vec![event])
    }
}

/// CloseDispute action
#[derive(Debug, Clone)]
pub struct CloseDisputeAction {
    pub dispute_id: String,
}

impl CommandHandler for CloseDisputeAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_admin(meta.role, "CLOSE_DISPUTE")?;
        let mut dispute = ctx.dispute(&self.dispute_id)?;
        ensure_dispute_transition(dispute.status, DisputeStatus::Closed)?;

        let previous = dispute.status;
        dispute.status = DisputeStatus::Closed;

        let event = LifecycleEvent::transition(
            EventType::DisputeClosed,
            EntityKind::Dispute,
            dispute.id.clone(),
            previous.as_str(),
            dispute.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_dispute(dispute)?;
        Ok(vec![event])
    }
}
