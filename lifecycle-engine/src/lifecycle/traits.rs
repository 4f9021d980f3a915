//! Command processing traits and context
//!
//! `CommandContext` stages collection mutations for one command. Actions read
//! and mutate through it; the engine commits the dirty collections after the
//! action succeeds. The context never writes on its own before `commit`, so
//! a failed check leaves the store untouched.

use crate::config::EngineConfig;
use crate::store::LedgerStore;
use shared::models::{
    Coupon, Dispute, Order, Payout, Project, Proposal, Report, Review, SupportTicket,
};
use shared::{AppError, AppResult, Command, ErrorCode, LifecycleEvent, Role};

/// Metadata extracted from the command envelope
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub command_id: String,
    pub actor_id: String,
    pub role: Role,
    /// Client timestamp, kept for audit; event timestamps are engine-set
    pub timestamp: i64,
}

impl From<&Command> for CommandMetadata {
    fn from(cmd: &Command) -> Self {
        Self {
            command_id: cmd.command_id.clone(),
            actor_id: cmd.actor_id.clone(),
            role: cmd.role,
            timestamp: cmd.timestamp,
        }
    }
}

/// A command action: validates against current state and stages mutations
pub trait CommandHandler {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>>;
}

/// Lazily loaded, possibly dirty copy of one collection
struct Slot<T> {
    items: Option<Vec<T>>,
    dirty: bool,
}

impl<T: crate::store::Persisted> Slot<T> {
    fn new() -> Self {
        Self {
            items: None,
            dirty: false,
        }
    }

    fn load(&mut self, store: &LedgerStore) -> AppResult<&mut Vec<T>> {
        if self.items.is_none() {
            self.items = Some(store.read::<T>()?);
        }
        Ok(self.items.get_or_insert_with(Vec::new))
    }
}

/// Staged view of the ledger for one command
pub struct CommandContext<'a> {
    store: &'a LedgerStore,
    config: &'a EngineConfig,
    /// Coupon code whose redemption this command staged; drives the
    /// compensating rollback if a later collection save fails
    redeemed_coupon: Option<String>,
    coupons: Slot<Coupon>,
    orders: Slot<Order>,
    payouts: Slot<Payout>,
    disputes: Slot<Dispute>,
    reports: Slot<Report>,
    tickets: Slot<SupportTicket>,
    projects: Slot<Project>,
    proposals: Slot<Proposal>,
    reviews: Slot<Review>,
}

impl<'a> CommandContext<'a> {
    pub fn new(store: &'a LedgerStore, config: &'a EngineConfig) -> Self {
        Self {
            store,
            config,
            redeemed_coupon: None,
            coupons: Slot::new(),
            orders: Slot::new(),
            payouts: Slot::new(),
            disputes: Slot::new(),
            reports: Slot::new(),
            tickets: Slot::new(),
            projects: Slot::new(),
            proposals: Slot::new(),
            reviews: Slot::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        self.config
    }

    // ========== Coupons ==========

    pub fn coupon(&mut self, code: &str) -> AppResult<Coupon> {
        let store = self.store;
        self.coupons
            .load(store)?
            .iter()
            .find(|c| c.code == code)
            .cloned()
            .ok_or_else(|| AppError::not_found(ErrorCode::CouponNotFound, format!("Coupon {code}")))
    }

    pub fn coupons(&mut self) -> AppResult<&[Coupon]> {
        let store = self.store;
        Ok(self.coupons.load(store)?.as_slice())
    }

    pub fn put_coupon(&mut self, coupon: Coupon) -> AppResult<()> {
        let store = self.store;
        let items = self.coupons.load(store)?;
        if let Some(existing) = items.iter_mut().find(|c| c.code == coupon.code) {
            *existing = coupon;
        } else {
            items.push(coupon);
        }
        self.coupons.dirty = true;
        Ok(())
    }

    /// Record that this command redeemed a coupon (enables compensation)
    pub fn mark_coupon_redeemed(&mut self, code: impl Into<String>) {
        self.redeemed_coupon = Some(code.into());
    }

    // ========== Orders ==========

    pub fn order(&mut self, id: &str) -> AppResult<Order> {
        let store = self.store;
        self.orders
            .load(store)?
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(ErrorCode::OrderNotFound, format!("Order {id}")))
    }

    pub fn orders(&mut self) -> AppResult<&[Order]> {
        let store = self.store;
        Ok(self.orders.load(store)?.as_slice())
    }

    pub fn put_order(&mut self, order: Order) -> AppResult<()> {
        let store = self.store;
        let items = self.orders.load(store)?;
        if let Some(existing) = items.iter_mut().find(|o| o.id == order.id) {
            *existing = order;
        } else {
            items.push(order);
        }
        self.orders.dirty = true;
        Ok(())
    }

    // ========== Payouts ==========

    pub fn payout(&mut self, id: &str) -> AppResult<Payout> {
        let store = self.store;
        self.payouts
            .load(store)?
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(ErrorCode::PayoutNotFound, format!("Payout {id}")))
    }

    pub fn payouts(&mut self) -> AppResult<&[Payout]> {
        let store = self.store;
        Ok(self.payouts.load(store)?.as_slice())
    }

    pub fn put_payout(&mut self, payout: Payout) -> AppResult<()> {
        let store = self.store;
        let items = self.payouts.load(store)?;
        if let Some(existing) = items.iter_mut().find(|p| p.id == payout.id) {
            *existing = payout;
        } else {
            items.push(payout);
        }
        self.payouts.dirty = true;
        Ok(())
    }

    // ========== Disputes ==========

    pub fn dispute(&mut self, id: &str) -> AppResult<Dispute> {
        let store = self.store;
        self.disputes
            .load(store)?
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(ErrorCode::DisputeNotFound, format!("Dispute {id}")))
    }

    pub fn put_dispute(&mut self, dispute: Dispute) -> AppResult<()> {
        let store = self.store;
        let items = self.disputes.load(store)?;
        if let Some(existing) = items.iter_mut().find(|d| d.id == dispute.id) {
            *existing = dispute;
        } else {
            items.push(dispute);
        }
        self.disputes.dirty = true;
        Ok(())
    }

    // ========== Reports ==========

    pub fn report(&mut self, id: &str) -> AppResult<Report> {
        let store = self.store;
        self.reports
            .load(store)?
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(ErrorCode::ReportNotFound, format!("Report {id}")))
    }

    pub fn put_report(&mut self, report: Report) -> AppResult<()> {
        let store = self.store;
        let items = self.reports.load(store)?;
        if let Some(existing) = items.iter_mut().find(|r| r.id == report.id) {
            *existing = report;
        } else {
            items.push(report);
        }
        self.reports.dirty = true;
        Ok(())
    }

    // ========== Support tickets ==========

    pub fn ticket(&mut self, id: &str) -> AppResult<SupportTicket> {
        let store = self.store;
        self.tickets
            .load(store)?
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| {
                AppError::not_found(ErrorCode::TicketNotFound, format!("Support ticket {id}"))
            })
    }

    pub fn put_ticket(&mut self, ticket: SupportTicket) -> AppResult<()> {
        let store = self.store;
        let items = self.tickets.load(store)?;
        if let Some(existing) = items.iter_mut().find(|t| t.id == ticket.id) {
            *existing = ticket;
        } else {
            items.push(ticket);
        }
        self.tickets.dirty = true;
        Ok(())
    }

    // ========== Projects ==========

    pub fn project(&mut self, id: &str) -> AppResult<Project> {
        let store = self.store;
        self.projects
            .load(store)?
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(ErrorCode::ProjectNotFound, format!("Project {id}")))
    }

    pub fn put_project(&mut self, project: Project) -> AppResult<()> {
        let store = self.store;
        let items = self.projects.load(store)?;
        if let Some(existing) = items.iter_mut().find(|p| p.id == project.id) {
            *existing = project;
        } else {
            items.push(project);
        }
        self.projects.dirty = true;
        Ok(())
    }

    // ========== Proposals ==========

    pub fn proposal(&mut self, id: &str) -> AppResult<Proposal> {
        let store = self.store;
        self.proposals
            .load(store)?
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| {
                AppError::not_found(ErrorCode::ProposalNotFound, format!("Proposal {id}"))
            })
    }

    pub fn proposals(&mut self) -> AppResult<&[Proposal]> {
        let store = self.store;
        Ok(self.proposals.load(store)?.as_slice())
    }

    pub fn put_proposal(&mut self, proposal: Proposal) -> AppResult<()> {
        let store = self.store;
        let items = self.proposals.load(store)?;
        if let Some(existing) = items.iter_mut().find(|p| p.id == proposal.id) {
            *existing = proposal;
        } else {
            items.push(proposal);
        }
        self.proposals.dirty = true;
        Ok(())
    }

    // ========== Reviews ==========

    pub fn review(&mut self, id: &str) -> AppResult<Review> {
        let store = self.store;
        self.reviews
            .load(store)?
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(ErrorCode::ReviewNotFound, format!("Review {id}")))
    }

    pub fn reviews(&mut self) -> AppResult<&[Review]> {
        let store = self.store;
        Ok(self.reviews.load(store)?.as_slice())
    }

    pub fn put_review(&mut self, review: Review) -> AppResult<()> {
        let store = self.store;
        let items = self.reviews.load(store)?;
        if let Some(existing) = items.iter_mut().find(|r| r.id == review.id) {
            *existing = review;
        } else {
            items.push(review);
        }
        self.reviews.dirty = true;
        Ok(())
    }

    // ========== Commit ==========

    /// Persist every dirty collection, coupons first.
    ///
    /// The coupon collection is written before any other so that an order
    /// referencing a redemption never lands without the redemption itself.
    /// If a later save fails after the coupon save succeeded, the staged
    /// redemption is rolled back (compensating action; the gateway has no
    /// multi-collection transaction).
    pub(crate) fn commit(&mut self) -> AppResult<()> {
        if self.coupons.dirty {
            if let Some(items) = self.coupons.items.as_deref() {
                self.store.write(items)?;
            }
            self.coupons.dirty = false;
        }
        if let Err(err) = self.commit_remaining() {
            self.roll_back_redemption();
            return Err(err);
        }
        self.redeemed_coupon = None;
        Ok(())
    }

    fn commit_remaining(&mut self) -> AppResult<()> {
        if self.orders.dirty {
            if let Some(items) = self.orders.items.as_deref() {
                self.store.write(items)?;
            }
            self.orders.dirty = false;
        }
        if self.payouts.dirty {
            if let Some(items) = self.payouts.items.as_deref() {
                self.store.write(items)?;
            }
            self.payouts.dirty = false;
        }
        if self.disputes.dirty {
            if let Some(items) = self.disputes.items.as_deref() {
                self.store.write(items)?;
            }
            self.disputes.dirty = false;
        }
        if self.reports.dirty {
            if let Some(items) = self.reports.items.as_deref() {
                self.store.write(items)?;
            }
            self.reports.dirty = false;
        }
        if self.tickets.dirty {
            if let Some(items) = self.tickets.items.as_deref() {
                self.store.write(items)?;
            }
            self.tickets.dirty = false;
        }
        if self.projects.dirty {
            if let Some(items) = self.projects.items.as_deref() {
                self.store.write(items)?;
            }
            self.projects.dirty = false;
        }
        if self.proposals.dirty {
            if let Some(items) = self.proposals.items.as_deref() {
                self.store.write(items)?;
            }
            self.proposals.dirty = false;
        }
        if self.reviews.dirty {
            if let Some(items) = self.reviews.items.as_deref() {
                self.store.write(items)?;
            }
            self.reviews.dirty = false;
        }
        Ok(())
    }

    fn roll_back_redemption(&mut self) {
        let Some(code) = self.redeemed_coupon.take() else {
            return;
        };
        let result = self.store.read::<Coupon>().and_then(|mut coupons| {
            if let Some(coupon) = coupons.iter_mut().find(|c| c.code == code) {
                coupon.used_count = coupon.used_count.saturating_sub(1);
            }
            self.store.write(&coupons)
        });
        match result {
            Ok(()) => {
                tracing::warn!(code = %code, "Rolled back coupon redemption after failed persistence")
            }
            Err(err) => {
                tracing::error!(code = %code, error = %err, "Failed to roll back coupon redemption")
            }
        }
    }
}
