//! Project entity
//!
//! A buyer-posted project that sellers bid on with proposals. Accepting a
//! proposal moves the project from Open to InProgress.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Project status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Open,
    InProgress,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A posted project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    /// Project ID
    pub id: String,
    /// Posting buyer
    pub client_id: String,
    /// Project title
    pub title: String,
    /// Budget (minor units)
    pub budget_amount: i64,
    /// Project status
    pub status: ProjectStatus,
    /// Creation timestamp
    pub created_at: i64,
}
