//! Collaborator interfaces
//!
//! The core owns no storage. Bookings, rooms, closures and guests live behind
//! these request/response capabilities; each call either returns the success
//! payload or a [`RemoteError`] carrying a message.

use crate::error::RemoteError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sbb_model::{
    Booking, BookingId, ClosureId, DateRange, Guest, HotelClosure, HotelId, NewBooking,
    NewClosure, NewGuest, Room, Transition,
};
use std::sync::Arc;

/// Result of a collaborator call
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Booking resource
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// All bookings of a hotel
    async fn by_hotel(&self, hotel: HotelId) -> RemoteResult<Vec<Booking>>;

    /// Bookings of a hotel whose stay touches `range`
    async fn by_range(&self, hotel: HotelId, range: DateRange) -> RemoteResult<Vec<Booking>>;

    /// Apply a status transition (`PATCH /bookings/{id}/{action}`)
    async fn apply_transition(&self, id: BookingId, transition: Transition) -> RemoteResult<()>;

    /// Create a booking; the backend assigns id and initial status
    async fn create(&self, booking: NewBooking) -> RemoteResult<Booking>;
}

/// Room resource
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomGateway: Send + Sync {
    /// Rooms of a hotel
    async fn by_hotel(&self, hotel: HotelId) -> RemoteResult<Vec<Room>>;

    /// Rooms of a hotel with no active booking over the stay `[check_in, check_out)`
    async fn free_rooms(
        &self,
        hotel: HotelId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> RemoteResult<Vec<Room>>;
}

/// Hotel closure resource
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClosureGateway: Send + Sync {
    /// Closures of a hotel
    async fn by_hotel(&self, hotel: HotelId) -> RemoteResult<Vec<HotelClosure>>;

    /// Create a closure
    async fn create(&self, closure: NewClosure) -> RemoteResult<HotelClosure>;

    /// Delete a whole closure
    async fn delete(&self, id: ClosureId) -> RemoteResult<()>;

    /// Reopen `range`, splitting or trimming overlapping closures server-side
    async fn reopen(&self, hotel: HotelId, range: DateRange) -> RemoteResult<()>;
}

/// Guest resource
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuestGateway: Send + Sync {
    /// Every registered guest
    async fn all(&self) -> RemoteResult<Vec<Guest>>;

    /// Register a guest
    async fn create(&self, guest: NewGuest) -> RemoteResult<Guest>;
}

/// The four collaborators a desk session talks to
#[derive(Clone)]
pub struct Gateways {
    pub bookings: Arc<dyn BookingGateway>,
    pub rooms: Arc<dyn RoomGateway>,
    pub closures: Arc<dyn ClosureGateway>,
    pub guests: Arc<dyn GuestGateway>,
}

impl Gateways {
    /// Bundle four collaborators
    #[must_use]
    pub fn new(
        bookings: Arc<dyn BookingGateway>,
        rooms: Arc<dyn RoomGateway>,
        closures: Arc<dyn ClosureGateway>,
        guests: Arc<dyn GuestGateway>,
    ) -> Self {
        Self {
            bookings,
            rooms,
            closures,
            guests,
        }
    }

    /// Use one backend for every resource
    #[must_use]
    pub fn shared<B>(backend: Arc<B>) -> Self
    where
        B: BookingGateway + RoomGateway + ClosureGateway + GuestGateway + 'static,
    {
        Self {
            bookings: backend.clone(),
            rooms: backend.clone(),
            closures: backend.clone(),
            guests: backend,
        }
    }
}

impl std::fmt::Debug for Gateways {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateways").finish_non_exhaustive()
    }
}
