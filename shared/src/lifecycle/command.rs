//! Commands - requests from callers to modify the ledger
//!
//! A command names exactly one transition (or entity creation), carries the
//! caller's identity and claimed role, and a unique `command_id` used to
//! reject accidental double submission.

use crate::models::{CouponKind, DisputeReason, Priority, ReportTargetType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller role; authentication is the transport layer's concern, the engine
/// only gates transitions on the claimed role and ownership.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Buyer,
    Seller,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Buyer => "BUYER",
            Self::Seller => "SELLER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    /// Unique command ID (idempotency key)
    pub command_id: String,
    /// Acting user ID
    pub actor_id: String,
    /// Claimed role of the actor
    pub role: Role,
    /// Client timestamp (Unix milliseconds), kept for audit
    pub timestamp: i64,
    /// Command payload
    pub payload: CommandPayload,
}

/// Command payload variants, one per transition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandPayload {
    // ========== Orders ==========
    CreateOrder {
        seller_id: String,
        service_id: String,
        gross_amount: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        coupon_code: Option<String>,
    },
    AcceptOrder {
        order_id: String,
    },
    DeliverOrder {
        order_id: String,
    },
    ApproveDelivery {
        order_id: String,
    },
    RequestRevision {
        order_id: String,
    },
    CancelOrder {
        order_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    // ========== Payouts ==========
    RequestPayout {
        amount: i64,
        bank: String,
        account: String,
    },
    ApprovePayout {
        payout_id: String,
    },
    RejectPayout {
        payout_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    CompletePayout {
        payout_id: String,
    },

    // ========== Disputes ==========
    OpenDispute {
        order_id: String,
        reason: DisputeReason,
        #[serde(default)]
        priority: Priority,
        #[serde(skip_serializing_if = "Option::is_none")]
        amount: Option<i64>,
    },
    ResolveDispute {
        dispute_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        resolution_note: Option<String>,
    },
    CloseDispute {
        dispute_id: String,
    },

    // ========== Reports ==========
    FileReport {
        target_type: ReportTargetType,
        target_id: String,
        reason: String,
    },
    ResolveReport {
        report_id: String,
    },
    DismissReport {
        report_id: String,
    },

    // ========== Support tickets ==========
    OpenTicket {
        subject: String,
        #[serde(default)]
        priority: Priority,
    },
    AssignTicket {
        ticket_id: String,
        assignee: String,
    },
    ResolveTicket {
        ticket_id: String,
    },
    CloseTicket {
        ticket_id: String,
    },

    // ========== Projects and proposals ==========
    PostProject {
        title: String,
        budget_amount: i64,
    },
    SubmitProposal {
        project_id: String,
        price: i64,
        delivery_days: u32,
    },
    AcceptProposal {
        proposal_id: String,
    },
    RejectProposal {
        proposal_id: String,
    },
    WithdrawProposal {
        proposal_id: String,
    },

    // ========== Reviews ==========
    SubmitReview {
        order_id: String,
        rating: u8,
        comment: String,
    },
    ReplyReview {
        review_id: String,
        reply: String,
    },
    HideReview {
        review_id: String,
    },

    // ========== Coupons ==========
    CreateCoupon {
        code: String,
        kind: CouponKind,
        value: i64,
        usage_limit: u32,
        expires_at: i64,
    },
    DeactivateCoupon {
        code: String,
    },
}

impl CommandPayload {
    /// Command name for logging and tracing
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateOrder { .. } => "CREATE_ORDER",
            Self::AcceptOrder { .. } => "ACCEPT_ORDER",
            Self::DeliverOrder { .. } => "DELIVER_ORDER",
            Self::ApproveDelivery { .. } => "APPROVE_DELIVERY",
            Self::RequestRevision { .. } => "REQUEST_REVISION",
            Self::CancelOrder { .. } => "CANCEL_ORDER",
            Self::RequestPayout { .. } => "REQUEST_PAYOUT",
            Self::ApprovePayout { .. } => "APPROVE_PAYOUT",
            Self::RejectPayout { .. } => "REJECT_PAYOUT",
            Self::CompletePayout { .. } => "COMPLETE_PAYOUT",
            Self::OpenDispute { .. } => "OPEN_DISPUTE",
            Self::ResolveDispute { .. } => "RESOLVE_DISPUTE",
            Self::CloseDispute { .. } => "CLOSE_DISPUTE",
            Self::FileReport { .. } => "FILE_REPORT",
            Self::ResolveReport { .. } => "RESOLVE_REPORT",
            Self::DismissReport { .. } => "DISMISS_REPORT",
            Self::OpenTicket { .. } => "OPEN_TICKET",
            Self::AssignTicket { .. } => "ASSIGN_TICKET",
            Self::ResolveTicket { .. } => "RESOLVE_TICKET",
            Self::CloseTicket { .. } => "CLOSE_TICKET",
            Self::PostProject { .. } => "POST_PROJECT",
            Self::SubmitProposal { .. } => "SUBMIT_PROPOSAL",
            Self::AcceptProposal { .. } => "ACCEPT_PROPOSAL",
            Self::RejectProposal { .. } => "REJECT_PROPOSAL",
            Self::WithdrawProposal { .. } => "WITHDRAW_PROPOSAL",
            Self::SubmitReview { .. } => "SUBMIT_REVIEW",
            Self::ReplyReview { .. } => "REPLY_REVIEW",
            Self::HideReview { .. } => "HIDE_REVIEW",
            Self::CreateCoupon { .. } => "CREATE_COUPON",
            Self::DeactivateCoupon { .. } => "DEACTIVATE_COUPON",
        }
    }
}

impl Command {
    /// Build a command with a fresh id and the current timestamp
    pub fn new(actor_id: impl Into<String>, role: Role, payload: CommandPayload) -> Self {
        Self {
            command_id: crate::util::new_id(),
            actor_id: actor_id.into(),
            role,
            timestamp: crate::util::now_millis(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_new_generates_unique_ids() {
        let a = Command::new(
            "buyer-1",
            Role::Buyer,
            CommandPayload::DeliverOrder {
                order_id: "ord-1".to_string(),
            },
        );
        let b = Command::new(
            "buyer-1",
            Role::Buyer,
            CommandPayload::DeliverOrder {
                order_id: "ord-1".to_string(),
            },
        );
        assert_ne!(a.command_id, b.command_id);
    }

    #[test]
    fn test_payload_serialization_tag() {
        let payload = CommandPayload::ApprovePayout {
            payout_id: "pay-1".to_string(),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"type\":\"APPROVE_PAYOUT\""));

        let back: CommandPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name(), "APPROVE_PAYOUT");
    }
}
