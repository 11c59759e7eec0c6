//! Bookings and their status state machine
//!
//! ```text
//! PENDING --accept--> CHECKED_IN --checkout--> CHECKED_OUT --complete--> COMPLETE
//! PENDING --cancel--> CANCELED
//! ```

use crate::error::{ParseError, TransitionError};
use crate::ids::{BookingId, GuestId, RoomId};
use crate::room::RoomStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Booking status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Inserted, waiting to be accepted or refused
    #[default]
    Pending,
    /// Accepted; the guest is in the room
    CheckedIn,
    /// The guest has left; the room awaits cleaning
    CheckedOut,
    /// Room cleaned; final state
    Complete,
    /// Refused while pending; final state
    Canceled,
}

impl BookingStatus {
    /// Every status, in lifecycle order
    pub const ALL: [BookingStatus; 5] = [
        Self::Pending,
        Self::CheckedIn,
        Self::CheckedOut,
        Self::Complete,
        Self::Canceled,
    ];

    /// Whether a booking in this status holds its room (counts for occupancy)
    #[inline]
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::CheckedIn)
    }

    /// Whether no further transition is possible
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Canceled)
    }

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::CheckedIn => "CHECKED_IN",
            Self::CheckedOut => "CHECKED_OUT",
            Self::Complete => "COMPLETE",
            Self::Canceled => "CANCELED",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == upper)
            .ok_or_else(|| ParseError::BookingStatus(s.to_string()))
    }
}

/// A requested status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// PENDING → CHECKED_IN, room becomes occupied
    Accept,
    /// PENDING → CANCELED, room untouched
    Cancel,
    /// CHECKED_IN → CHECKED_OUT, room needs cleaning
    Checkout,
    /// CHECKED_OUT → COMPLETE, room available again
    Complete,
}

impl Transition {
    pub const ALL: [Transition; 4] = [Self::Accept, Self::Cancel, Self::Checkout, Self::Complete];

    /// The only status this transition may start from
    #[inline]
    #[must_use]
    pub const fn source(self) -> BookingStatus {
        match self {
            Self::Accept | Self::Cancel => BookingStatus::Pending,
            Self::Checkout => BookingStatus::CheckedIn,
            Self::Complete => BookingStatus::CheckedOut,
        }
    }

    #[inline]
    #[must_use]
    pub const fn target(self) -> BookingStatus {
        match self {
            Self::Accept => BookingStatus::CheckedIn,
            Self::Cancel => BookingStatus::Canceled,
            Self::Checkout => BookingStatus::CheckedOut,
            Self::Complete => BookingStatus::Complete,
        }
    }

    /// Room status set as a side effect, if any
    #[inline]
    #[must_use]
    pub const fn room_effect(self) -> Option<RoomStatus> {
        match self {
            Self::Accept => Some(RoomStatus::Occupied),
            Self::Cancel => None,
            Self::Checkout => Some(RoomStatus::ToClean),
            Self::Complete => Some(RoomStatus::Available),
        }
    }

    /// REST path segment (`PATCH /bookings/{id}/{action}`)
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::Accept => "checkin",
            Self::Cancel => "cancel",
            Self::Checkout => "checkout",
            Self::Complete => "complete",
        }
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Accept => "accept",
            Self::Cancel => "cancel",
            Self::Checkout => "checkout",
            Self::Complete => "complete",
        };
        f.write_str(name)
    }
}

impl FromStr for Transition {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accept" | "checkin" | "check-in" => Ok(Self::Accept),
            "cancel" => Ok(Self::Cancel),
            "checkout" | "check-out" => Ok(Self::Checkout),
            "complete" => Ok(Self::Complete),
            _ => Err(ParseError::Transition(s.to_string())),
        }
    }
}

/// Transitions that may be applied from `from`
#[must_use]
pub fn allowed_transitions(from: BookingStatus) -> Vec<Transition> {
    Transition::ALL
        .into_iter()
        .filter(|t| t.source() == from)
        .collect()
}

/// Validates a transition and returns the status it leads to.
pub fn validate_transition(
    from: BookingStatus,
    transition: Transition,
) -> Result<BookingStatus, TransitionError> {
    if transition.source() == from {
        Ok(transition.target())
    } else {
        Err(TransitionError {
            action: transition,
            current: from,
            expected: transition.source(),
        })
    }
}

/// A guest's stay in a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub guest_id: GuestId,
    pub room_id: RoomId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub price: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: BookingStatus,
}

impl Booking {
    /// Whether the stay covers `day`. Half-open: the check-out day is free.
    #[inline]
    #[must_use]
    pub fn occupies(&self, day: NaiveDate) -> bool {
        self.check_in <= day && day < self.check_out
    }

    /// Whether the booking holds its room on `day`
    #[inline]
    #[must_use]
    pub fn holds_room_on(&self, day: NaiveDate) -> bool {
        self.status.is_active() && self.occupies(day)
    }

    /// Whether the stay intersects the half-open stay `[check_in, check_out)`
    #[inline]
    #[must_use]
    pub fn overlaps_stay(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        self.check_in < check_out && check_in < self.check_out
    }

    /// Moves the booking through `transition`, leaving it untouched on error.
    pub fn apply(&mut self, transition: Transition) -> Result<BookingStatus, TransitionError> {
        let next = validate_transition(self.status, transition)?;
        self.status = next;
        Ok(next)
    }
}

/// Payload for creating a booking; the backend assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub guest_id: GuestId,
    pub room_id: RoomId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub price: u32,
    pub notes: String,
}

impl NewBooking {
    /// Materialize with a backend id. New bookings always start pending.
    #[must_use]
    pub fn into_booking(self, id: BookingId) -> Booking {
        Booking {
            id,
            guest_id: self.guest_id,
            room_id: self.room_id,
            check_in: self.check_in,
            check_out: self.check_out,
            price: self.price,
            notes: self.notes,
            status: BookingStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn booking(status: BookingStatus) -> Booking {
        Booking {
            id: BookingId(1),
            guest_id: GuestId(1),
            room_id: RoomId(1),
            check_in: d("2025-06-10"),
            check_out: d("2025-06-12"),
            price: 180,
            notes: String::new(),
            status,
        }
    }

    #[test]
    fn pending_transitions() {
        assert_eq!(
            allowed_transitions(BookingStatus::Pending),
            vec![Transition::Accept, Transition::Cancel]
        );
        assert!(validate_transition(BookingStatus::Pending, Transition::Checkout).is_err());
    }

    #[test]
    fn terminal_states_have_no_exit() {
        assert!(allowed_transitions(BookingStatus::Complete).is_empty());
        assert!(allowed_transitions(BookingStatus::Canceled).is_empty());
    }

    #[test]
    fn full_lifecycle() {
        let mut b = booking(BookingStatus::Pending);
        b.apply(Transition::Accept).unwrap();
        b.apply(Transition::Checkout).unwrap();
        b.apply(Transition::Complete).unwrap();
        assert_eq!(b.status, BookingStatus::Complete);
    }

    #[test]
    fn failed_apply_keeps_status() {
        let mut b = booking(BookingStatus::CheckedIn);
        let err = b.apply(Transition::Complete).unwrap_err();
        assert_eq!(err.current, BookingStatus::CheckedIn);
        assert_eq!(err.expected, BookingStatus::CheckedOut);
        assert_eq!(b.status, BookingStatus::CheckedIn);
        assert!(err.to_string().contains("cannot complete"));
    }

    #[test]
    fn checkout_day_is_free() {
        let b = booking(BookingStatus::CheckedIn);
        assert!(b.occupies(d("2025-06-10")));
        assert!(b.occupies(d("2025-06-11")));
        assert!(!b.occupies(d("2025-06-12")));
    }

    #[test]
    fn canceled_booking_does_not_hold_room() {
        let b = booking(BookingStatus::Canceled);
        assert!(!b.holds_room_on(d("2025-06-10")));
    }

    #[test]
    fn status_wire_format() {
        let json = serde_json::to_string(&BookingStatus::CheckedIn).unwrap();
        assert_eq!(json, "\"CHECKED_IN\"");
        assert_eq!("checked_in".parse::<BookingStatus>().unwrap(), BookingStatus::CheckedIn);
        assert_eq!("checkin".parse::<Transition>().unwrap(), Transition::Accept);
    }

    #[test]
    fn action_path_segments() {
        let actions: Vec<&str> = Transition::ALL.iter().map(|t| t.action()).collect();
        assert_eq!(actions, ["checkin", "cancel", "checkout", "complete"]);
        for t in Transition::ALL {
            assert_eq!(t.action().parse::<Transition>().unwrap(), t);
        }
        assert_eq!(Transition::Accept.to_string(), "accept");
    }

    #[test]
    fn booking_payload_is_camel_case() {
        let json = serde_json::to_value(booking(BookingStatus::Pending)).unwrap();
        assert_eq!(json["checkIn"], "2025-06-10");
        assert_eq!(json["roomId"], 1);
    }

    fn any_status() -> impl Strategy<Value = BookingStatus> {
        prop::sample::select(BookingStatus::ALL.to_vec())
    }

    fn any_transition() -> impl Strategy<Value = Transition> {
        prop::sample::select(Transition::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_validation_agrees_with_allowed(from in any_status(), t in any_transition()) {
            let res = validate_transition(from, t);
            prop_assert_eq!(res.is_ok(), allowed_transitions(from).contains(&t));
        }

        #[test]
        fn prop_terminal_rejects_everything(t in any_transition()) {
            prop_assert!(validate_transition(BookingStatus::Complete, t).is_err());
            prop_assert!(validate_transition(BookingStatus::Canceled, t).is_err());
        }
    }
}
