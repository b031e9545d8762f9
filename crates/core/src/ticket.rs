//! Ticket status enumeration and status-driven timestamp transitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Number of days a closed ticket remains visible on the board.
pub const CLOSED_VISIBILITY_DAYS: i64 = 7;

/// The five kanban columns, in board display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Open,
    InProgress,
    Waiting,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// All statuses in board display order.
    pub const ALL: [TicketStatus; 5] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Waiting,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    /// The wire/database representation (`SCREAMING_SNAKE_CASE`).
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "OPEN",
            TicketStatus::InProgress => "IN_PROGRESS",
            TicketStatus::Waiting => "WAITING",
            TicketStatus::Resolved => "RESOLVED",
            TicketStatus::Closed => "CLOSED",
        }
    }

    /// Parse a wire/database status string.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "OPEN" => Ok(TicketStatus::Open),
            "IN_PROGRESS" => Ok(TicketStatus::InProgress),
            "WAITING" => Ok(TicketStatus::Waiting),
            "RESOLVED" => Ok(TicketStatus::Resolved),
            "CLOSED" => Ok(TicketStatus::Closed),
            other => Err(CoreError::Validation(format!(
                "Invalid ticket status '{other}'. Must be one of: OPEN, IN_PROGRESS, WAITING, RESOLVED, CLOSED"
            ))),
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket priority, denormalized onto board cards for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl TicketPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketPriority::Low => "LOW",
            TicketPriority::Normal => "NORMAL",
            TicketPriority::High => "HIGH",
            TicketPriority::Urgent => "URGENT",
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a status transition does to one lifecycle timestamp column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampDelta {
    /// Leave the stored value untouched.
    #[default]
    Keep,
    /// Set the value to the transition time.
    Set,
    /// Clear the value to null.
    Clear,
}

impl TimestampDelta {
    /// Apply this delta to a stored value, using `now` for `Set`.
    pub fn apply(self, current: Option<Timestamp>, now: Timestamp) -> Option<Timestamp> {
        match self {
            TimestampDelta::Keep => current,
            TimestampDelta::Set => Some(now),
            TimestampDelta::Clear => None,
        }
    }
}

/// Status-driven changes to `resolved_at` / `closed_at` for one transition.
///
/// Re-entering a status the ticket is already in never resets its timestamp;
/// only a genuine transition into `Resolved`/`Closed` sets one, and only a
/// genuine transition out clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub resolved_at: TimestampDelta,
    pub closed_at: TimestampDelta,
}

impl StatusTransition {
    /// Compute the timestamp deltas for moving from `previous` to `next`.
    pub fn compute(previous: TicketStatus, next: TicketStatus) -> Self {
        Self {
            resolved_at: delta_for(previous, next, TicketStatus::Resolved),
            closed_at: delta_for(previous, next, TicketStatus::Closed),
        }
    }

    /// True when neither timestamp column changes.
    pub fn is_noop(&self) -> bool {
        self.resolved_at == TimestampDelta::Keep && self.closed_at == TimestampDelta::Keep
    }
}

fn delta_for(previous: TicketStatus, next: TicketStatus, marker: TicketStatus) -> TimestampDelta {
    if next == marker && previous != marker {
        TimestampDelta::Set
    } else if previous == marker && next != marker {
        TimestampDelta::Clear
    } else {
        TimestampDelta::Keep
    }
}
