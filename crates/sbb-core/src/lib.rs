//! SBB Core - hotel occupancy
//!
//! The front-desk logic of one hotel session:
//! - Drives bookings through their lifecycle and keeps room status in step
//! - Builds the monthly availability calendar from bookings and closures
//! - Turns drag gestures over the calendar into close and reopen requests
//! - Looks guests up by name
//!
//! Storage lives behind the collaborator traits in [`ports`];
//! [`InMemoryBackend`] implements all of them in process.
//!
//! # Example
//!
//! ```rust,ignore
//! use sbb_core::{DeskConfig, Gateways, HotelDesk, InMemoryBackend};
//! use std::sync::Arc;
//!
//! # async fn example(backend: Arc<InMemoryBackend>) -> Result<(), sbb_core::DeskError> {
//! let desk = HotelDesk::new(DeskConfig::new(), Gateways::shared(backend));
//! desk.load().await?;
//!
//! for day in desk.calendar().iter().filter(|d| d.is_current_month) {
//!     println!("{} {}/{}", day.date, day.occupied_rooms, day.total_rooms);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod boards;
pub mod calendar;
pub mod config;
pub mod desk;
pub mod error;
pub mod guests;
pub mod lifecycle;
pub mod memory;
pub mod ports;
pub mod reservations;
pub mod selection;
pub mod store;

// Re-exports for convenience
pub use boards::{BookingFilter, RoomFilter};
pub use calendar::{build_month, classify, CalendarDay, ClosureRef, DayClass};
pub use config::{BackendRules, DeskConfig, LoggingConfig};
pub use desk::HotelDesk;
pub use error::{
    ConfigError, DeskError, Entity, RemoteError, RemoteErrorKind, ValidationError,
};
pub use guests::GuestMatcher;
pub use lifecycle::BookingLifecycle;
pub use memory::{InMemoryBackend, Snapshot};
pub use ports::{
    BookingGateway, ClosureGateway, Gateways, GuestGateway, RemoteResult, RoomGateway,
};
pub use reservations::BookingDraft;
pub use selection::{DragSelection, SelectionOutcome};
pub use store::{Collection, Committed, Grid, LoadTicket, OccupancyStore};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with a desk session
    pub use crate::{
        BookingDraft, CalendarDay, DayClass, DeskConfig, DeskError, Gateways, HotelDesk,
        InMemoryBackend, SelectionOutcome,
    };
    pub use sbb_model::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use chrono::NaiveDate;
    use sbb_model::{Booking, BookingId, BookingStatus, GuestId, HotelId, Room, RoomId, RoomStatus};
    use std::sync::Arc;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn desk_full_flow() {
        let backend = InMemoryBackend::new(d("2025-06-12"));
        backend.add_room(Room::new(RoomId(1), HotelId(1), "101", 90));
        backend.add_booking(Booking {
            id: BookingId(1),
            guest_id: GuestId(1),
            room_id: RoomId(1),
            check_in: d("2025-06-10"),
            check_out: d("2025-06-12"),
            price: 180,
            notes: String::new(),
            status: BookingStatus::Pending,
        });

        let config = DeskConfig::new().with_today(d("2025-06-12"));
        let desk = HotelDesk::new(config, Gateways::shared(Arc::new(backend)));
        desk.load().await.unwrap();

        desk.accept(BookingId(1)).await.unwrap();
        desk.checkout(BookingId(1)).await.unwrap();
        desk.complete(BookingId(1)).await.unwrap();

        assert_eq!(desk.room_counts()[&RoomStatus::Available], 1);
        assert_eq!(desk.booking_counts()[&BookingStatus::Complete], 1);
        assert_eq!(desk.day_class(d("2025-06-10")), Some(DayClass::Neutral));
    }

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
