//! Allocation status and request type enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of an allocation request. `Pending` is the only non-terminal
/// state; approved and rejected requests are immutable apart from the
/// audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "allocation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AllocationStatus {
    /// Awaiting an admin decision.
    Pending,
    /// Granted; the student was assigned a room.
    Approved,
    /// Declined by an admin.
    Rejected,
}

impl AllocationStatus {
    /// Whether this status admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether a transition from `self` to `next` is legal.
    pub fn can_transition_to(&self, next: AllocationStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the student is requesting a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    /// First room assignment.
    Initial,
    /// Move to a different room.
    Change,
    /// Exchange rooms with another student.
    Swap,
}

impl RequestType {
    /// Whether approving this request vacates the student's current room.
    pub fn vacates_previous_room(&self) -> bool {
        matches!(self, Self::Change | Self::Swap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pending_transitions() {
        assert!(AllocationStatus::Pending.can_transition_to(AllocationStatus::Approved));
        assert!(AllocationStatus::Pending.can_transition_to(AllocationStatus::Rejected));
        assert!(!AllocationStatus::Approved.can_transition_to(AllocationStatus::Rejected));
        assert!(!AllocationStatus::Rejected.can_transition_to(AllocationStatus::Approved));
        assert!(!AllocationStatus::Pending.can_transition_to(AllocationStatus::Pending));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!AllocationStatus::Pending.is_terminal());
        assert!(AllocationStatus::Approved.is_terminal());
        assert!(AllocationStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_vacating_request_types() {
        assert!(!RequestType::Initial.vacates_previous_room());
        assert!(RequestType::Change.vacates_previous_room());
        assert!(RequestType::Swap.vacates_previous_room());
    }
}
