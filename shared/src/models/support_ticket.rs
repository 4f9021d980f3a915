//! Support ticket entity

use super::Priority;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Support ticket status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user support ticket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupportTicket {
    /// Ticket ID
    pub id: String,
    /// User who opened the ticket
    pub user_id: String,
    /// Subject line
    pub subject: String,
    /// Priority
    pub priority: Priority,
    /// Assigned agent; required once status leaves Open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Ticket status
    pub status: TicketStatus,
    /// Creation timestamp
    pub created_at: i64,
}

impl SupportTicket {
    /// Check the assignee invariant: required once status != Open
    pub fn assignment_consistent(&self) -> bool {
        self.status == TicketStatus::Open || self.assignee.is_some()
    }
}
