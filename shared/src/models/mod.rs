//! Entity models for the marketplace ledger
//!
//! One module per entity kind. Every entity carries an explicit status enum;
//! statuses serialize as SCREAMING_SNAKE_CASE strings.

mod coupon;
mod dispute;
mod order;
mod payout;
mod project;
mod proposal;
mod report;
mod review;
mod support_ticket;

pub use coupon::{Coupon, CouponKind};
pub use dispute::{Dispute, DisputeReason, DisputeStatus};
pub use order::{Order, OrderStatus};
pub use payout::{Payout, PayoutStatus};
pub use project::{Project, ProjectStatus};
pub use proposal::{Proposal, ProposalStatus};
pub use report::{Report, ReportStatus, ReportTargetType};
pub use review::{Review, ReviewStatus};
pub use support_ticket::{SupportTicket, TicketStatus};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity kinds managed by the lifecycle engine
///
/// The declaration order is the canonical lock-acquisition order; commands
/// spanning multiple kinds (coupon redemption inside order creation) must
/// lock in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Coupon,
    Order,
    Payout,
    Dispute,
    Report,
    SupportTicket,
    Project,
    Proposal,
    Review,
}

impl EntityKind {
    /// All kinds, in canonical order
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Coupon,
        EntityKind::Order,
        EntityKind::Payout,
        EntityKind::Dispute,
        EntityKind::Report,
        EntityKind::SupportTicket,
        EntityKind::Project,
        EntityKind::Proposal,
        EntityKind::Review,
    ];

    /// Name of the persisted collection for this kind
    pub fn collection_name(&self) -> &'static str {
        match self {
            Self::Coupon => "coupons",
            Self::Order => "orders",
            Self::Payout => "payouts",
            Self::Dispute => "disputes",
            Self::Report => "reports",
            Self::SupportTicket => "support_tickets",
            Self::Project => "projects",
            Self::Proposal => "proposals",
            Self::Review => "reviews",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coupon => "COUPON",
            Self::Order => "ORDER",
            Self::Payout => "PAYOUT",
            Self::Dispute => "DISPUTE",
            Self::Report => "REPORT",
            Self::SupportTicket => "SUPPORT_TICKET",
            Self::Project => "PROJECT",
            Self::Proposal => "PROPOSAL",
            Self::Review => "REVIEW",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority level for disputes and support tickets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_puts_coupon_before_order() {
        assert!(EntityKind::Coupon < EntityKind::Order);
        let mut kinds = vec![EntityKind::Order, EntityKind::Coupon];
        kinds.sort();
        assert_eq!(kinds, vec![EntityKind::Coupon, EntityKind::Order]);
    }

    #[test]
    fn test_collection_names_are_unique() {
        let mut names: Vec<_> = EntityKind::ALL.iter().map(|k| k.collection_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), EntityKind::ALL.len());
    }

    #[test]
    fn test_kind_serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&EntityKind::SupportTicket).unwrap();
        assert_eq!(json, "\"SUPPORT_TICKET\"");
    }
}
