//! Ledger reconciler - derived views computed on demand
//!
//! Balances and aggregates are always derived from committed entities,
//! never stored, so there is no cached total to drift. Reads take no lock;
//! the gateway's atomic save keeps each collection snapshot consistent.

use crate::store::LedgerStore;
use serde::{Deserialize, Serialize};
use shared::AppResult;
use shared::models::{
    Dispute, DisputeStatus, Order, OrderStatus, Payout, Report, ReportStatus, SupportTicket,
    TicketStatus,
};

/// Net amount a seller has earned across completed orders
pub fn earned_net(orders: &[Order], seller_id: &str) -> i64 {
    orders
        .iter()
        .filter(|o| o.seller_id == seller_id && o.status == OrderStatus::Completed)
        .map(|o| o.net_seller_amount)
        .sum()
}

/// Amount reserved by a seller's approved and completed payouts
pub fn reserved_amount(payouts: &[Payout], seller_id: &str) -> i64 {
    payouts
        .iter()
        .filter(|p| p.seller_id == seller_id && p.status.reserves_balance())
        .map(|p| p.amount)
        .sum()
}

/// A seller's reconciled available payout balance
pub fn available_balance(orders: &[Order], payouts: &[Payout], seller_id: &str) -> i64 {
    earned_net(orders, seller_id) - reserved_amount(payouts, seller_id)
}

/// Per-seller earnings statement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SellerStatement {
    pub seller_id: String,
    pub completed_orders: u32,
    pub gross: i64,
    pub discounts: i64,
    pub fees: i64,
    pub net_earned: i64,
    pub paid_out: i64,
    pub available: i64,
}

/// Platform-wide aggregates for the admin overview
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlatformOverview {
    pub orders_pending: u32,
    pub orders_in_progress: u32,
    pub orders_completed: u32,
    pub orders_cancelled: u32,
    pub fee_revenue: i64,
    pub open_disputes: u32,
    pub open_reports: u32,
    pub open_tickets: u32,
}

/// Read-only reconciler over the ledger store
#[derive(Clone)]
pub struct Reconciler {
    store: LedgerStore,
}

impl Reconciler {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Sum of net amounts over the seller's completed orders, minus the
    /// seller's approved and completed payouts. Recomputed on every call.
    pub fn available_balance(&self, seller_id: &str) -> AppResult<i64> {
        let orders: Vec<Order> = self.store.read()?;
        let payouts: Vec<Payout> = self.store.read()?;
        Ok(available_balance(&orders, &payouts, seller_id))
    }

    /// Full earnings statement for one seller
    pub fn seller_statement(&self, seller_id: &str) -> AppResult<SellerStatement> {
        let orders: Vec<Order> = self.store.read()?;
        let payouts: Vec<Payout> = self.store.read()?;

        let completed: Vec<&Order> = orders
            .iter()
            .filter(|o| o.seller_id == seller_id && o.status == OrderStatus::Completed)
            .collect();
        let net_earned: i64 = completed.iter().map(|o| o.net_seller_amount).sum();
        let paid_out = reserved_amount(&payouts, seller_id);

        Ok(SellerStatement {
            seller_id: seller_id.to_string(),
            completed_orders: completed.len() as u32,
            gross: completed.iter().map(|o| o.gross_amount).sum(),
            discounts: completed.iter().map(|o| o.discount_amount).sum(),
            fees: completed.iter().map(|o| o.platform_fee_amount).sum(),
            net_earned,
            paid_out,
            available: net_earned - paid_out,
        })
    }

    /// Order counts, fee revenue, and open moderation work
    pub fn platform_overview(&self) -> AppResult<PlatformOverview> {
        let orders: Vec<Order> = self.store.read()?;
        let disputes: Vec<Dispute> = self.store.read()?;
        let reports: Vec<Report> = self.store.read()?;
        let tickets: Vec<SupportTicket> = self.store.read()?;

        let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count() as u32;

        Ok(PlatformOverview {
            orders_pending: count(OrderStatus::Pending),
            orders_in_progress: count(OrderStatus::InProgress),
            orders_completed: count(OrderStatus::Completed),
            orders_cancelled: count(OrderStatus::Cancelled),
            fee_revenue: orders
                .iter()
                .filter(|o| o.status == OrderStatus::Completed)
                .map(|o| o.platform_fee_amount)
                .sum(),
            open_disputes: disputes
                .iter()
                .filter(|d| d.status == DisputeStatus::Open)
                .count() as u32,
            open_reports: reports
                .iter()
                .filter(|r| r.status == ReportStatus::Open)
                .count() as u32,
            open_tickets: tickets
                .iter()
                .filter(|t| t.status == TicketStatus::Open)
                .count() as u32,
        })
    }
}
