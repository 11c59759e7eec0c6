//! SBB Model
//!
//! Domain types for the hotel occupancy core.
//!
//! # Core Concepts
//!
//! - [`Booking`]: a guest's stay in a room, driven by the [`BookingStatus`] state machine
//! - [`Room`]: a bookable room whose [`RoomStatus`] follows booking transitions
//! - [`HotelClosure`]: an inclusive date range during which the hotel takes no bookings
//! - [`DateRange`] / [`YearMonth`]: calendar primitives shared by every consumer
//!
//! # Example
//!
//! ```rust
//! use sbb_model::{BookingStatus, Transition, validate_transition};
//!
//! let next = validate_transition(BookingStatus::Pending, Transition::Accept).unwrap();
//! assert_eq!(next, BookingStatus::CheckedIn);
//! assert!(validate_transition(BookingStatus::Pending, Transition::Complete).is_err());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod booking;
pub mod closure;
mod dates;
mod error;
mod guest;
mod ids;
mod room;

// Re-exports
pub use booking::{allowed_transitions, validate_transition, Booking, BookingStatus, NewBooking, Transition};
pub use closure::{carve, ClosureCarve, HotelClosure, NewClosure};
pub use dates::{DateRange, YearMonth};
pub use error::{ParseError, TransitionError};
pub use guest::{Guest, NewGuest};
pub use ids::{BookingId, ClosureId, GuestId, HotelId, RoomId};
pub use room::{Room, RoomStatus};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the occupancy model
    pub use crate::{
        Booking, BookingId, BookingStatus, DateRange, Guest, GuestId, HotelClosure, HotelId,
        Room, RoomId, RoomStatus, Transition, YearMonth,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
