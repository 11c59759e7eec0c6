//! Error types for the occupancy model

use crate::booking::{BookingStatus, Transition};

/// Illegal booking state transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} booking: status is {current}, expected {expected}")]
pub struct TransitionError {
    /// Requested action
    pub action: Transition,
    /// Status the booking is in
    pub current: BookingStatus,
    /// Status the action requires
    pub expected: BookingStatus,
}

/// Failure to parse a textual model value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Unknown booking status
    #[error("unknown booking status: {0}")]
    BookingStatus(String),

    /// Unknown room status
    #[error("unknown room status: {0}")]
    RoomStatus(String),

    /// Unknown transition name
    #[error("unknown transition: {0}")]
    Transition(String),

    /// Month not in `YYYY-MM` form
    #[error("invalid month (expected YYYY-MM): {0}")]
    Month(String),
}
