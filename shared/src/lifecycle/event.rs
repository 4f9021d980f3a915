//! Lifecycle events - immutable facts recorded after command processing

use crate::models::EntityKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    // Orders
    OrderCreated,
    OrderAccepted,
    OrderDelivered,
    RevisionRequested,
    OrderCompleted,
    OrderCancelled,

    // Payouts
    PayoutRequested,
    PayoutApproved,
    PayoutRejected,
    PayoutCompleted,

    // Disputes
    DisputeOpened,
    DisputeResolved,
    DisputeClosed,

    // Reports
    ReportFiled,
    ReportResolved,
    ReportDismissed,

    // Support tickets
    TicketOpened,
    TicketAssigned,
    TicketResolved,
    TicketClosed,

    // Projects and proposals
    ProjectPosted,
    ProjectAssigned,
    ProposalSubmitted,
    ProposalAccepted,
    ProposalRejected,
    ProposalWithdrawn,

    // Reviews
    ReviewSubmitted,
    ReviewReplied,
    ReviewHidden,

    // Coupons
    CouponCreated,
    CouponDeactivated,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::OrderCreated => write!(f, "ORDER_CREATED"),
            EventType::OrderAccepted => write!(f, "ORDER_ACCEPTED"),
            EventType::OrderDelivered => write!(f, "ORDER_DELIVERED"),
            EventType::RevisionRequested => write!(f, "REVISION_REQUESTED"),
            EventType::OrderCompleted => write!(f, "ORDER_COMPLETED"),
            EventType::OrderCancelled => write!(f, "ORDER_CANCELLED"),
            EventType::PayoutRequested => write!(f, "PAYOUT_REQUESTED"),
            EventType::PayoutApproved => write!(f, "PAYOUT_APPROVED"),
            EventType::PayoutRejected => write!(f, "PAYOUT_REJECTED"),
            EventType::PayoutCompleted => write!(f, "PAYOUT_COMPLETED"),
            EventType::DisputeOpened => write!(f, "DISPUTE_OPENED"),
            EventType::DisputeResolved => write!(f, "DISPUTE_RESOLVED"),
            EventType::DisputeClosed => write!(f, "DISPUTE_CLOSED"),
            EventType::ReportFiled => write!(f, "REPORT_FILED"),
            EventType::ReportResolved => write!(f, "REPORT_RESOLVED"),
            EventType::ReportDismissed => write!(f, "REPORT_DISMISSED"),
            EventType::TicketOpened => write!(f, "TICKET_OPENED"),
            EventType::TicketAssigned => write!(f, "TICKET_ASSIGNED"),
            EventType::TicketResolved => write!(f, "TICKET_RESOLVED"),
            EventType::TicketClosed => write!(f, "TICKET_CLOSED"),
            EventType::ProjectPosted => write!(f, "PROJECT_POSTED"),
            EventType::ProjectAssigned => write!(f, "PROJECT_ASSIGNED"),
            EventType::ProposalSubmitted => write!(f, "PROPOSAL_SUBMITTED"),
            EventType::ProposalAccepted => write!(f, "PROPOSAL_ACCEPTED"),
            EventType::ProposalRejected => write!(f, "PROPOSAL_REJECTED"),
            EventType::ProposalWithdrawn => write!(f, "PROPOSAL_WITHDRAWN"),
            EventType::ReviewSubmitted => write!(f, "REVIEW_SUBMITTED"),
            EventType::ReviewReplied => write!(f, "REVIEW_REPLIED"),
            EventType::ReviewHidden => write!(f, "REVIEW_HIDDEN"),
            EventType::CouponCreated => write!(f, "COUPON_CREATED"),
            EventType::CouponDeactivated => write!(f, "COUPON_DEACTIVATED"),
        }
    }
}

/// Lifecycle event - immutable audit record
///
/// The `occurred_at` timestamp is always set by the engine when the event is
/// created; it is authoritative, unlike the command's client timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LifecycleEvent {
    /// Event unique ID
    pub event_id: String,
    /// Event type
    pub event_type: EventType,
    /// Kind of the affected entity
    pub kind: EntityKind,
    /// Affected entity ID
    pub entity_id: String,
    /// Status before the transition; None for entity creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<String>,
    /// Status after the transition
    pub new_status: String,
    /// Engine timestamp (Unix milliseconds)
    pub occurred_at: i64,
    /// Actor who triggered this event
    pub actor_id: String,
    /// Command that produced this event (for audit tracing)
    pub command_id: String,
}

impl LifecycleEvent {
    /// Create a new event for a status transition
    pub fn transition(
        event_type: EventType,
        kind: EntityKind,
        entity_id: impl Into<String>,
        previous_status: impl Into<String>,
        new_status: impl Into<String>,
        actor_id: impl Into<String>,
        command_id: impl Into<String>,
    ) -> Self {
        Self {
            event_id: crate::util::new_id(),
            event_type,
            kind,
            entity_id: entity_id.into(),
            previous_status: Some(previous_status.into()),
            new_status: new_status.into(),
            occurred_at: crate::util::now_millis(),
            actor_id: actor_id.into(),
            command_id: command_id.into(),
        }
    }

    /// Create a new event for an entity creation (no previous status)
    pub fn created(
        event_type: EventType,
        kind: EntityKind,
        entity_id: impl Into<String>,
        new_status: impl Into<String>,
        actor_id: impl Into<String>,
        command_id: impl Into<String>,
    ) -> Self {
        Self {
            event_id: crate::util::new_id(),
            event_type,
            kind,
            entity_id: entity_id.into(),
            previous_status: None,
            new_status: new_status.into(),
            occurred_at: crate::util::now_millis(),
            actor_id: actor_id.into(),
            command_id: command_id.into(),
        }
    }
}
