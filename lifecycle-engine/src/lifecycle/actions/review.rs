//! Review command handlers

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata};
use crate::validator::ensure_owner;
use crate::validator::transitions::{ensure_admin, ensure_review_transition, ensure_role};
use shared::models::{EntityKind, OrderStatus, Review, ReviewStatus};
use shared::util::{new_id, now_millis};
use shared::{AppError, AppResult, ErrorCode, EventType, LifecycleEvent, Role};

/// SubmitReview action - one review per completed order
#[derive(Debug, Clone)]
pub struct SubmitReviewAction {
    pub order_id: String,
    pub rating: u8,
    pub comment: String,
}

impl CommandHandler for SubmitReviewAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_role(meta.role, Role::Buyer, "SUBMIT_REVIEW")?;
        let order = ctx.order(&self.order_id)?;
        ensure_owner(&meta.actor_id, &order.buyer_id, "order's buyer")?;

        if order.status != OrderStatus::Completed {
            return Err(AppError::conflict(
                ErrorCode::OrderNotCompleted,
                format!("Cannot review order in {} status", order.status),
            ));
        }

        let already_reviewed = ctx.reviews()?.iter().any(|r| r.order_id == order.id);
        if already_reviewed {
            return Err(AppError::conflict(
                ErrorCode::ReviewAlreadyExists,
                format!("Order {} already has a review", order.id),
            ));
        }

        let review = Review {
            id: new_id(),
            order_id: order.id,
            buyer_id: order.buyer_id,
            seller_id: order.seller_id,
            rating: self.rating,
            comment: self.comment.clone(),
            status: ReviewStatus::Visible,
            reply: None,
            created_at: now_millis(),
        };

        let event = LifecycleEvent::created(
            EventType::ReviewSubmitted,
            EntityKind::Review,
            review.id.clone(),
            review.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_review(review)?;
        Ok(vec![event])
    }
}

/// ReplyReview action - the reviewed seller answers once
#[derive(Debug, Clone)]
pub struct ReplyReviewAction {
    pub review_id: String,
    pub reply: String,
}

impl CommandHandler for ReplyReviewAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_role(meta.role, Role::Seller, "REPLY_REVIEW")?;
        let mut review = ctx.review(&self.review_id)?;
        ensure_owner(&meta.actor_id, &review.seller_id, "review's seller")?;

        if review.status != ReviewStatus::Visible {
            return Err(AppError::transition(format!(
                "Cannot reply to review in {} status",
                review.status
            )));
        }

        review.reply = Some(self.reply.clone());

        let event = LifecycleEvent::transition(
            EventType::ReviewReplied,
            EntityKind::Review,
            review.id.clone(),
            review.status.as_str(),
            review.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_review(review)?;
        Ok(vec![event])
    }
}

/// HideReview action - admin moderation
#[derive(Debug, Clone)]
pub struct HideReviewAction {
    pub review_id: String,
}

impl CommandHandler for HideReviewAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_admin(meta.role, "HIDE_REVIEW")?;
        let mut review = ctx.review(&self.review_id)?;
        ensure_review_transition(review.status, ReviewStatus::Hidden)?;

        let previous = review.status;
        review.status = ReviewStatus::Hidden;

        let event = LifecycleEvent::transition(
            EventType::ReviewHidden,
            EntityKind::Review,
            review.id.clone(),
            previous.as_str(),
            review.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_review(review)?;
        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::store::LedgerStore;
    use shared::models::Order;

    fn test_meta(actor: &str, role: Role) -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor_id: actor.to_string(),
            role,
            timestamp: 1_700_000_000_000,
        }
    }

    fn order_with_status(status: OrderStatus) -> Order {
        Order {
            id: "ord-1".to_string(),
            buyer_id: "buyer-1".to_string(),
            seller_id: "seller-1".to_string(),
            service_id: "svc-1".to_string(),
            gross_amount: 100_000,
            discount_amount: 0,
            platform_fee_amount: 10_000,
            net_seller_amount: 90_000,
            status,
            coupon_code: None,
            delivery_count: 1,
            delivered_at: Some(1_700_000_000_000),
            created_at: 1_700_000_000_000,
            completed_at: if status == OrderStatus::Completed {
                Some(1_700_000_100_000)
            } else {
                None
            },
        }
    }

    fn submit_review(ctx: &mut CommandContext<'_>, actor: &str) -> AppResult<Review> {
        let events = SubmitReviewAction {
            order_id: "ord-1".to_string(),
            rating: 5,
            comment: "Fast and precise work".to_string(),
        }
        .execute(ctx, &test_meta(actor, Role::Buyer))?;
        ctx.review(&events[0].entity_id)
    }

    #[test]
    fn test_review_completed_order() {
        let store = LedgerStore::open_in_memory().unwrap();
        store
            .write(&[order_with_status(OrderStatus::Completed)])
            .unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let review = submit_review(&mut ctx, "buyer-1").unwrap();
        assert_eq!(review.status, ReviewStatus::Visible);
        assert_eq!(review.rating, 5);
        assert_eq!(review.seller_id, "seller-1");
    }

    #[test]
    fn test_cannot_review_unfinished_order() {
        let store = LedgerStore::open_in_memory().unwrap();
        store
            .write(&[order_with_status(OrderStatus::InProgress)])
            .unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let err = submit_review(&mut ctx, "buyer-1").unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotCompleted);
    }

    #[test]
    fn test_one_review_per_order() {
        let store = LedgerStore::open_in_memory().unwrap();
        store
            .write(&[order_with_status(OrderStatus::Completed)])
            .unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        submit_review(&mut ctx, "buyer-1").unwrap();
        let err = submit_review(&mut ctx, "buyer-1").unwrap_err();
        assert_eq!(err.code, ErrorCode::ReviewAlreadyExists);
    }

    #[test]
    fn test_only_buyer_reviews() {
        let store = LedgerStore::open_in_memory().unwrap();
        store
            .write(&[order_with_status(OrderStatus::Completed)])
            .unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let err = submit_review(&mut ctx, "buyer-2").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotOwner);
    }

    #[test]
    fn test_seller_reply() {
        let store = LedgerStore::open_in_memory().unwrap();
        store
            .write(&[order_with_status(OrderStatus::Completed)])
            .unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let review = submit_review(&mut ctx, "buyer-1").unwrap();
        ReplyReviewAction {
            review_id: review.id.clone(),
            reply: "Thank you!".to_string(),
        }
        .execute(&mut ctx, &test_meta("seller-1", Role::Seller))
        .unwrap();

        assert_eq!(
            ctx.review(&review.id).unwrap().reply.as_deref(),
            Some("Thank you!")
        );
    }

    #[test]
    fn test_hide_then_no_reply() {
        let store = LedgerStore::open_in_memory().unwrap();
        store
            .write(&[order_with_status(OrderStatus::Completed)])
            .unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let review = submit_review(&mut ctx, "buyer-1").unwrap();
        HideReviewAction {
            review_id: review.id.clone(),
        }
        .execute(&mut ctx, &test_meta("admin-1", Role::Admin))
        .unwrap();

        let err = ReplyReviewAction {
            review_id: review.id.clone(),
            reply: "Thanks".to_string(),
        }
        .execute(&mut ctx, &test_meta("seller-1", Role::Seller))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);

        // Hidden is terminal
        let err = HideReviewAction {
            review_id: review.id,
        }
        .execute(&mut ctx, &test_meta("admin-1", Role::Admin))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::TerminalState);
    }
}
