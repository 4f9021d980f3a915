//! Command API - the single surface external callers use
//!
//! Thin dispatch: each method builds the command envelope for one named
//! transition and hands it to the engine, returning the primary event. The
//! transport layer (HTTP, UI bridge, tests) decides who the actor is;
//! authentication is its concern, not the engine's.

use crate::config::EngineConfig;
use crate::lifecycle::LifecycleEngine;
use crate::reconciler::Reconciler;
use crate::store::{LedgerStore, StorageResult};
use shared::models::{CouponKind, DisputeReason, Order, Priority, ReportTargetType};
use shared::{AppError, AppResult, Command, CommandPayload, LifecycleEvent, Role};
use std::path::Path;
use tokio::sync::broadcast;

/// Marketplace command surface
#[derive(Clone)]
pub struct MarketplaceApi {
    engine: LifecycleEngine,
    reconciler: Reconciler,
}

impl MarketplaceApi {
    pub fn new(engine: LifecycleEngine) -> Self {
        let reconciler = Reconciler::new(engine.store().clone());
        Self { engine, reconciler }
    }

    /// Open or create a redb-backed marketplace at the given path
    pub fn open(path: impl AsRef<Path>, config: EngineConfig) -> StorageResult<Self> {
        Ok(Self::new(LifecycleEngine::open(path, config)?))
    }

    /// In-memory marketplace (for testing)
    pub fn open_in_memory(config: EngineConfig) -> StorageResult<Self> {
        Ok(Self::new(LifecycleEngine::new(
            LedgerStore::open_in_memory()?,
            config,
        )))
    }

    /// The underlying engine
    pub fn engine(&self) -> &LifecycleEngine {
        &self.engine
    }

    /// Read-only derived views
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.engine.subscribe()
    }

    /// Execute a pre-built command envelope
    pub fn execute(&self, cmd: Command) -> AppResult<Vec<LifecycleEvent>> {
        self.engine.execute(cmd)
    }

    fn run(&self, actor_id: &str, role: Role, payload: CommandPayload) -> AppResult<LifecycleEvent> {
        let mut events = self.engine.execute(Command::new(actor_id, role, payload))?;
        if events.is_empty() {
            // Every action emits at least one event; this is a bug guard.
            return Err(AppError::internal("command produced no events"));
        }
        Ok(events.remove(0))
    }

    // ========== Orders ==========

    pub fn create_order(
        &self,
        buyer_id: &str,
        seller_id: &str,
        service_id: &str,
        gross_amount: i64,
        coupon_code: Option<&str>,
    ) -> AppResult<LifecycleEvent> {
        self.run(
            buyer_id,
            Role::Buyer,
            CommandPayload::CreateOrder {
                seller_id: seller_id.to_string(),
                service_id: service_id.to_string(),
                gross_amount,
                coupon_code: coupon_code.map(str::to_string),
            },
        )
    }

    pub fn accept_order(&self, seller_id: &str, order_id: &str) -> AppResult<LifecycleEvent> {
        self.run(
            seller_id,
            Role::Seller,
            CommandPayload::AcceptOrder {
                order_id: order_id.to_string(),
            },
        )
    }

    pub fn deliver_order(&self, seller_id: &str, order_id: &str) -> AppResult<LifecycleEvent> {
        self.run(
            seller_id,
            Role::Seller,
            CommandPayload::DeliverOrder {
                order_id: order_id.to_string(),
            },
        )
    }

    pub fn approve_delivery(&self, buyer_id: &str, order_id: &str) -> AppResult<LifecycleEvent> {
        self.run(
            buyer_id,
            Role::Buyer,
            CommandPayload::ApproveDelivery {
                order_id: order_id.to_string(),
            },
        )
    }

    pub fn request_revision(&self, buyer_id: &str, order_id: &str) -> AppResult<LifecycleEvent> {
        self.run(
            buyer_id,
            Role::Buyer,
            CommandPayload::RequestRevision {
                order_id: order_id.to_string(),
            },
        )
    }

    pub fn cancel_order(
        &self,
        actor_id: &str,
        role: Role,
        order_id: &str,
        reason: Option<&str>,
    ) -> AppResult<LifecycleEvent> {
        self.run(
            actor_id,
            role,
            CommandPayload::CancelOrder {
                order_id: order_id.to_string(),
                reason: reason.map(str::to_string),
            },
        )
    }

    // ========== Payouts ==========

    pub fn request_payout(
        &self,
        seller_id: &str,
        amount: i64,
        bank: &str,
        account: &str,
    ) -> AppResult<LifecycleEvent> {
        self.run(
            seller_id,
            Role::Seller,
            CommandPayload::RequestPayout {
                amount,
                bank: bank.to_string(),
                account: account.to_string(),
            },
        )
    }

    pub fn approve_payout(&self, admin_id: &str, payout_id: &str) -> AppResult<LifecycleEvent> {
        self.run(
            admin_id,
            Role::Admin,
            CommandPayload::ApprovePayout {
                payout_id: payout_id.to_string(),
            },
        )
    }

    pub fn reject_payout(
        &self,
        admin_id: &str,
        payout_id: &str,
        reason: Option<&str>,
    ) -> AppResult<LifecycleEvent> {
        self.run(
            admin_id,
            Role::Admin,
            CommandPayload::RejectPayout {
                payout_id: payout_id.to_string(),
                reason: reason.map(str::to_string),
            },
        )
    }

    pub fn complete_payout(&self, admin_id: &str, payout_id: &str) -> AppResult<LifecycleEvent> {
        self.run(
            admin_id,
            Role::Admin,
            CommandPayload::CompletePayout {
                payout_id: payout_id.to_string(),
            },
        )
    }

    // ========== Disputes ==========

    pub fn open_dispute(
        &self,
        actor_id: &str,
        role: Role,
        order_id: &str,
        reason: DisputeReason,
        priority: Priority,
        amount: Option<i64>,
    ) -> AppResult<LifecycleEvent> {
        self.run(
            actor_id,
            role,
            CommandPayload::OpenDispute {
                order_id: order_id.to_string(),
                reason,
                priority,
                amount,
            },
        )
    }

    pub fn resolve_dispute(
        &self,
        admin_id: &str,
        dispute_id: &str,
        resolution_note: Option<&str>,
    ) -> AppResult<LifecycleEvent> {
        self.run(
            admin_id,
            Role::Admin,
            CommandPayload::ResolveDispute {
                dispute_id: dispute_id.to_string(),
                resolution_note: resolution_note.map(str::to_string),
            },
        )
    }

    pub fn close_dispute(&self, admin_id: &str, dispute_id: &str) -> AppResult<LifecycleEvent> {
        self.run(
            admin_id,
            Role::Admin,
            CommandPayload::CloseDispute {
                dispute_id: dispute_id.to_string(),
            },
        )
    }

    // ========== Reports ==========

    pub fn file_report(
        &self,
        reporter_id: &str,
        role: Role,
        target_type: ReportTargetType,
        target_id: &str,
        reason: &str,
    ) -> AppResult<LifecycleEvent> {
        self.run(
            reporter_id,
            role,
            CommandPayload::FileReport {
                target_type,
                target_id: target_id.to_string(),
                reason: reason.to_string(),
            },
        )
    }

    pub fn resolve_report(&self, admin_id: &str, report_id: &str) -> AppResult<LifecycleEvent> {
        self.run(
            admin_id,
            Role::Admin,
            CommandPayload::ResolveReport {
                report_id: report_id.to_string(),
            },
        )
    }

    pub fn dismiss_report(&self, admin_id: &str, report_id: &str) -> AppResult<LifecycleEvent> {
        self.run(
            admin_id,
            Role::Admin,
            CommandPayload::DismissReport {
                report_id: report_id.to_string(),
            },
        )
    }

    // ========== Support tickets ==========

    pub fn open_ticket(
        &self,
        user_id: &str,
        role: Role,
        subject: &str,
        priority: Priority,
    ) -> AppResult<LifecycleEvent> {
        self.run(
            user_id,
            role,
            CommandPayload::OpenTicket {
                subject: subject.to_string(),
                priority,
            },
        )
    }

    pub fn assign_ticket(
        &self,
        admin_id: &str,
        ticket_id: &str,
        assignee: &str,
    ) -> AppResult<LifecycleEvent> {
        self.run(
            admin_id,
            Role::Admin,
            CommandPayload::AssignTicket {
                ticket_id: ticket_id.to_string(),
                assignee: assignee.to_string(),
            },
        )
    }

    pub fn resolve_ticket(&self, admin_id: &str, ticket_id: &str) -> AppResult<LifecycleEvent> {
        self.run(
            admin_id,
            Role::Admin,
            CommandPayload::ResolveTicket {
                ticket_id: ticket_id.to_string(),
            },
        )
    }

    pub fn close_ticket(&self, admin_id: &str, ticket_id: &str) -> AppResult<LifecycleEvent> {
        self.run(
            admin_id,
            Role::Admin,
            CommandPayload::CloseTicket {
                ticket_id: ticket_id.to_string(),
            },
        )
    }

    // ========== Projects and proposals ==========

    pub fn post_project(
        &self,
        client_id: &str,
        title: &str,
        budget_amount: i64,
    ) -> AppResult<LifecycleEvent> {
        self.run(
            client_id,
            Role::Buyer,
            CommandPayload::PostProject {
                title: title.to_string(),
                budget_amount,
            },
        )
    }

    pub fn submit_proposal(
        &self,
        expert_id: &str,
        project_id: &str,
        price: i64,
        delivery_days: u32,
    ) -> AppResult<LifecycleEvent> {
        self.run(
            expert_id,
            Role::Seller,
            CommandPayload::SubmitProposal {
                project_id: project_id.to_string(),
                price,
                delivery_days,
            },
        )
    }

    pub fn accept_proposal(&self, client_id: &str, proposal_id: &str) -> AppResult<LifecycleEvent> {
        self.run(
            client_id,
            Role::Buyer,
            CommandPayload::AcceptProposal {
                proposal_id: proposal_id.to_string(),
            },
        )
    }

    pub fn reject_proposal(&self, client_id: &str, proposal_id: &str) -> AppResult<LifecycleEvent> {
        self.run(
            client_id,
            Role::Buyer,
            CommandPayload::RejectProposal {
                proposal_id: proposal_id.to_string(),
            },
        )
    }

    pub fn withdraw_proposal(
        &self,
        expert_id: &str,
        proposal_id: &str,
    ) -> AppResult<LifecycleEvent> {
        self.run(
            expert_id,
            Role::Seller,
            CommandPayload::WithdrawProposal {
                proposal_id: proposal_id.to_string(),
            },
        )
    }

    // ========== Reviews ==========

    pub fn submit_review(
        &self,
        buyer_id: &str,
        order_id: &str,
        rating: u8,
        comment: &str,
    ) -> AppResult<LifecycleEvent> {
        self.run(
            buyer_id,
            Role::Buyer,
            CommandPayload::SubmitReview {
                order_id: order_id.to_string(),
                rating,
                comment: comment.to_string(),
            },
        )
    }

    pub fn reply_review(
        &self,
        seller_id: &str,
        review_id: &str,
        reply: &str,
    ) -> AppResult<LifecycleEvent> {
        self.run(
            seller_id,
            Role::Seller,
            CommandPayload::ReplyReview {
                review_id: review_id.to_string(),
                reply: reply.to_string(),
            },
        )
    }

    pub fn hide_review(&self, admin_id: &str, review_id: &str) -> AppResult<LifecycleEvent> {
        self.run(
            admin_id,
            Role::Admin,
            CommandPayload::HideReview {
                review_id: review_id.to_string(),
            },
        )
    }

    // ========== Coupons ==========

    pub fn create_coupon(
        &self,
        admin_id: &str,
        code: &str,
        kind: CouponKind,
        value: i64,
        usage_limit: u32,
        expires_at: i64,
    ) -> AppResult<LifecycleEvent> {
        self.run(
            admin_id,
            Role::Admin,
            CommandPayload::CreateCoupon {
                code: code.to_string(),
                kind,
                value,
                usage_limit,
                expires_at,
            },
        )
    }

    pub fn deactivate_coupon(&self, admin_id: &str, code: &str) -> AppResult<LifecycleEvent> {
        self.run(
            admin_id,
            Role::Admin,
            CommandPayload::DeactivateCoupon {
                code: code.to_string(),
            },
        )
    }

    // ========== Queries ==========

    /// Look up one order by id
    pub fn order(&self, order_id: &str) -> AppResult<Option<Order>> {
        self.engine.order(order_id)
    }

    /// A seller's reconciled available balance
    pub fn available_balance(&self, seller_id: &str) -> AppResult<i64> {
        self.reconciler.available_balance(seller_id)
    }
}
