//! Report entity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Report status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    #[default]
    Open,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Resolved => "RESOLVED",
            Self::Dismissed => "DISMISSED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Dismissed)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of entity a report targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportTargetType {
    User,
    Service,
    Project,
    Review,
}

/// A moderation report filed by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    /// Report ID
    pub id: String,
    /// Kind of entity being reported
    pub reported_type: ReportTargetType,
    /// ID of the reported entity
    pub target_id: String,
    /// Reporting user
    pub reporter_id: String,
    /// Reason text
    pub reason: String,
    /// Report status
    pub status: ReportStatus,
    /// Creation timestamp
    pub created_at: i64,
}
