//! Error types for SBB Core
//!
//! Three families, all recoverable by retrying the user action:
//! - Validation failures caught locally, before any remote call
//! - Remote-call failures reported by a collaborator
//! - Not-found conditions on the local cache, surfaced like remote failures

use chrono::NaiveDate;
use sbb_model::TransitionError;

/// Main desk error type
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    /// Local validation failed; nothing was sent
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Transition not allowed from the cached status; nothing was sent
    #[error("illegal transition: {0}")]
    IllegalTransition(#[from] TransitionError),

    /// Entity absent from the local cache
    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: u32 },

    /// Collaborator call failed; local state unchanged
    #[error("remote call failed: {0}")]
    Remote(#[from] RemoteError),
}

impl DeskError {
    /// Create a not-found error
    #[inline]
    pub fn not_found(entity: Entity, id: impl Into<u32>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Whether re-issuing the same action may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Remote(RemoteError {
                kind: RemoteErrorKind::Transport,
                ..
            })
        )
    }

    /// Message suitable for an inline notice next to the triggering control
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::IllegalTransition(e) => e.to_string(),
            Self::NotFound { entity, id } => format!("{entity} {id} no longer exists"),
            Self::Remote(e) => e.message.clone(),
        }
    }
}

/// Kinds of cached entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Booking,
    Room,
    Guest,
    Closure,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Booking => "booking",
            Self::Room => "room",
            Self::Guest => "guest",
            Self::Closure => "closure",
        };
        f.write_str(name)
    }
}

/// Failure reported by a collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RemoteError {
    /// Classification
    pub kind: RemoteErrorKind,
    /// Message carried by the response
    pub message: String,
}

impl RemoteError {
    /// Network or HTTP-level failure
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::Transport,
            message: message.into(),
        }
    }

    /// The backend refused the request
    #[inline]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::Rejected,
            message: message.into(),
        }
    }

    /// The backend does not know the resource
    #[inline]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::NotFound,
            message: message.into(),
        }
    }
}

/// Remote failure classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Network or HTTP transport failure
    Transport,
    /// Business rule rejection
    Rejected,
    /// Unknown resource
    NotFound,
}

impl std::fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Transport => "transport error",
            Self::Rejected => "rejected",
            Self::NotFound => "not found",
        };
        f.write_str(name)
    }
}

/// Local form validation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("select a guest before saving the booking")]
    MissingGuest,

    #[error("select a room before saving the booking")]
    MissingRoom,

    #[error("check-in and check-out dates are required")]
    MissingDates,

    #[error("check-out ({check_out}) must be after check-in ({check_in})")]
    StayNotOrdered {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("price must be between 0 and 4294967295, got {0}")]
    InvalidPrice(i64),

    #[error("guest first and last name are required")]
    MissingGuestName,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("cannot read config: {0}")]
    ReadFile(#[from] std::io::Error),

    /// Config file malformed
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantically invalid value
    #[error("invalid config: {0}")]
    Invalid(String),
}
