//! Support ticket command handlers
//!
//! Assignment is what moves a ticket out of Open, so the "assignee required
//! once status leaves Open" invariant holds structurally.

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata};
use crate::validator::transitions::{ensure_admin, ensure_ticket_transition};
use shared::models::{EntityKind, Priority, SupportTicket, TicketStatus};
use shared::util::{new_id, now_millis};
use shared::{AppResult, EventType, LifecycleEvent};

/// OpenTicket action - any user may open a ticket
#[derive(Debug, Clone)]
pub struct OpenTicketAction {
    pub subject: String,
    pub priority: Priority,
}

impl CommandHandler for OpenTicketAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        let ticket = SupportTicket {
            id: new_id(),
            user_id: meta.actor_id.clone(),
            subject: self.subject.clone(),
            priority: self.priority,
            assignee: None,
            status: TicketStatus::Open,
            created_at: now_millis(),
        };

        let event = LifecycleEvent::created(
            EventType::TicketOpened,
            EntityKind::SupportTicket,
            ticket.id.clone(),
            ticket.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_ticket(ticket)?;
        Ok(vec![event])
    }
}

/// AssignTicket action - assigns an agent and starts progress
#[derive(Debug, Clone)]
pub struct AssignTicketAction {
    pub ticket_id: String,
    pub assignee: String,
}

impl CommandHandler for AssignTicketAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_admin(meta.role, "ASSIGN_TICKET")?;
        let mut ticket = ctx.ticket(&self.ticket_id)?;
        ensure_ticket_transition(ticket.status, TicketStatus::InProgress)?;

        let previous = ticket.status;
        ticket.status = TicketStatus::InProgress;
        ticket.assignee = Some(self.assignee.clone());

        let event = LifecycleEvent::transition(
            EventType::TicketAssigned,
            EntityKind::SupportTicket,
            ticket.id.clone(),
            previous.as_str(),
            ticket.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_ticket(ticket)?;
        Ok(vec![event])
    }
}

/// ResolveTicket action
#[derive(Debug, Clone)]
pub struct ResolveTicketAction {
    pub ticket_id: String,
}

impl CommandHandler for ResolveTicketAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_admin(meta.role, "RESOLVE_TICKET")?;
        let mut ticket = ctx.ticket(&self.ticket_id)?;
        ensure_ticket_transition(ticket.status, TicketStatus::Resolved)?;

        let previous = ticket.status;
        ticket.status = TicketStatus::Resolved;

        let event = LifecycleEvent::transition(
            EventType::TicketResolved,
            EntityKind::SupportTicket,
            ticket.id.clone(),
            previous.as_str(),
            ticket.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_ticket(ticket)?;
        Ok(vec![event])
    }
}

/// CloseTicket action - from Resolved, or directly from InProgress (early close)
#[derive(Debug, Clone)]
pub struct CloseTicketAction {
    pub ticket_id: String,
}

impl CommandHandler for CloseTicketAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_admin(meta.role, "CLOSE_TICKET")?;
        let mut ticket = ctx.ticket(&self.ticket_id)?;
        ensure_ticket_transition(ticket.status, TicketStatus::Closed)?;

        let previous = ticket.status;
        ticket.status = TicketStatus::Closed;

        let event = LifecycleEvent::transition(
            EventType::TicketClosed,
            EntityKind::SupportTicket,
            ticket.id.clone(),
            previous.as_str(),
            ticket.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_ticket(ticket)?;
        Ok(vec![event])
    }
}
