//! Transition adjacency tables and role gates
//!
//! One table per entity kind: the single source of truth for which status
//! changes exist. Any pair not in a table fails, with `TerminalState` when
//! the current status admits no outgoing edge at all.

use shared::models::{
    DisputeStatus, OrderStatus, PayoutStatus, ProjectStatus, ProposalStatus, ReportStatus,
    ReviewStatus, TicketStatus,
};
use shared::{AppError, AppResult, ErrorCode, Role};

// ── Adjacency tables ────────────────────────────────────────────────

const ORDER_TRANSITIONS: &[(OrderStatus, OrderStatus)] = &[
    (OrderStatus::Pending, OrderStatus::InProgress),
    (OrderStatus::InProgress, OrderStatus::Completed),
    (OrderStatus::Pending, OrderStatus::Cancelled),
    (OrderStatus::InProgress, OrderStatus::Cancelled),
];

const PAYOUT_TRANSITIONS: &[(PayoutStatus, PayoutStatus)] = &[
    (PayoutStatus::Pending, PayoutStatus::Approved),
    (PayoutStatus::Pending, PayoutStatus::Rejected),
    (PayoutStatus::Approved, PayoutStatus::Completed),
];

const DISPUTE_TRANSITIONS: &[(DisputeStatus, DisputeStatus)] = &[
    (DisputeStatus::Open, DisputeStatus::Resolved),
    (DisputeStatus::Resolved, DisputeStatus::Closed),
];

const REPORT_TRANSITIONS: &[(ReportStatus, ReportStatus)] = &[
    (ReportStatus::Open, ReportStatus::Resolved),
    (ReportStatus::Open, ReportStatus::Dismissed),
];

const TICKET_TRANSITIONS: &[(TicketStatus, TicketStatus)] = &[
    (TicketStatus::Open, TicketStatus::InProgress),
    (TicketStatus::InProgress, TicketStatus::Resolved),
    (TicketStatus::Resolved, TicketStatus::Closed),
    // Early close without a resolution
    (TicketStatus::InProgress, TicketStatus::Closed),
];

const PROJECT_TRANSITIONS: &[(ProjectStatus, ProjectStatus)] =
    &[(ProjectStatus::Open, ProjectStatus::InProgress)];

const PROPOSAL_TRANSITIONS: &[(ProposalStatus, ProposalStatus)] = &[
    (ProposalStatus::Sent, ProposalStatus::Accepted),
    (ProposalStatus::Sent, ProposalStatus::Rejected),
    (ProposalStatus::Sent, ProposalStatus::Withdrawn),
];

const REVIEW_TRANSITIONS: &[(ReviewStatus, ReviewStatus)] =
    &[(ReviewStatus::Visible, ReviewStatus::Hidden)];

fn check<T>(table: &[(T, T)], from: T, to: T, kind: &str) -> AppResult<()>
where
    T: PartialEq + Copy + std::fmt::Display,
{
    if table.iter().any(|(f, t)| *f == from && *t == to) {
        return Ok(());
    }
    let code = if table.iter().any(|(f, _)| *f == from) {
        ErrorCode::InvalidTransition
    } else {
        ErrorCode::TerminalState
    };
    Err(AppError::with_message(
        code,
        format!("Cannot move {kind} from {from} to {to}"),
    ))
}

pub fn ensure_order_transition(from: OrderStatus, to: OrderStatus) -> AppResult<()> {
    check(ORDER_TRANSITIONS, from, to, "order")
}

pub fn ensure_payout_transition(from: PayoutStatus, to: PayoutStatus) -> AppResult<()> {
    check(PAYOUT_TRANSITIONS, from, to, "payout")
}

pub fn ensure_dispute_transition(from: DisputeStatus, to: DisputeStatus) -> AppResult<()> {
    check(DISPUTE_TRANSITIONS, from, to, "dispute")
}

pub fn ensure_report_transition(from: ReportStatus, to: ReportStatus) -> AppResult<()> {
    check(REPORT_TRANSITIONS, from, to, "report")
}

pub fn ensure_ticket_transition(from: TicketStatus, to: TicketStatus) -> AppResult<()> {
    check(TICKET_TRANSITIONS, from, to, "support ticket")
}

pub fn ensure_project_transition(from: ProjectStatus, to: ProjectStatus) -> AppResult<()> {
    check(PROJECT_TRANSITIONS, from, to, "project")
}

pub fn ensure_proposal_transition(from: ProposalStatus, to: ProposalStatus) -> AppResult<()> {
    check(PROPOSAL_TRANSITIONS, from, to, "proposal")
}

pub fn ensure_review_transition(from: ReviewStatus, to: ReviewStatus) -> AppResult<()> {
    check(REVIEW_TRANSITIONS, from, to, "review")
}

// ── Role and ownership gates ────────────────────────────────────────

/// Require an exact role for a command.
pub fn ensure_role(role: Role, required: Role, command: &str) -> AppResult<()> {
    if role == required {
        return Ok(());
    }
    Err(
        AppError::with_message(ErrorCode::RoleRequired, format!("{command} requires {required} role"))
            .with_detail("required_role", required.as_str())
            .with_detail("actual_role", role.as_str()),
    )
}

/// Require the admin role for a command.
pub fn ensure_admin(role: Role, command: &str) -> AppResult<()> {
    ensure_role(role, Role::Admin, command)
}

/// Require that the actor owns the entity side it is operating on.
pub fn ensure_owner(actor_id: &str, owner_id: &str, what: &str) -> AppResult<()> {
    if actor_id == owner_id {
        return Ok(());
    }
    Err(AppError::not_owner(format!(
        "Actor {actor_id} is not the {what}"
    )))
}
