//! Booking lifecycle manager
//!
//! Drives bookings through their status machine against the booking
//! collaborator. A transition is checked against the cached booking first;
//! only a confirmed remote call patches the cache.

use crate::error::{DeskError, Entity};
use crate::ports::BookingGateway;
use crate::reservations::BookingDraft;
use crate::store::{Committed, OccupancyStore};
use parking_lot::Mutex;
use sbb_model::{validate_transition, Booking, BookingId, Transition};
use std::sync::Arc;

/// Applies booking transitions and creations for one store
#[derive(Clone)]
pub struct BookingLifecycle {
    store: Arc<Mutex<OccupancyStore>>,
    bookings: Arc<dyn BookingGateway>,
}

impl BookingLifecycle {
    #[must_use]
    pub fn new(store: Arc<Mutex<OccupancyStore>>, bookings: Arc<dyn BookingGateway>) -> Self {
        Self { store, bookings }
    }

    /// Check the guest in: PENDING → CHECKED_IN, room occupied
    pub async fn accept(&self, id: BookingId) -> Result<Committed, DeskError> {
        self.apply(id, Transition::Accept).await
    }

    /// PENDING → CANCELED, room untouched
    pub async fn cancel(&self, id: BookingId) -> Result<Committed, DeskError> {
        self.apply(id, Transition::Cancel).await
    }

    /// CHECKED_IN → CHECKED_OUT, room to clean
    pub async fn checkout(&self, id: BookingId) -> Result<Committed, DeskError> {
        self.apply(id, Transition::Checkout).await
    }

    /// CHECKED_OUT → COMPLETE, room available and marked cleaned today
    pub async fn complete(&self, id: BookingId) -> Result<Committed, DeskError> {
        self.apply(id, Transition::Complete).await
    }

    /// Applies `transition` to booking `id`.
    ///
    /// # Errors
    ///
    /// - [`DeskError::NotFound`] when the booking is not cached
    /// - [`DeskError::IllegalTransition`] when the cached status does not allow it;
    ///   no remote call is made
    /// - [`DeskError::Remote`] when the collaborator refuses; the cache is untouched
    pub async fn apply(
        &self,
        id: BookingId,
        transition: Transition,
    ) -> Result<Committed, DeskError> {
        let current = self
            .store
            .lock()
            .find_booking(id)
            .map(|b| b.status)
            .ok_or_else(|| DeskError::not_found(Entity::Booking, id))?;
        validate_transition(current, transition)?;

        if let Err(e) = self.bookings.apply_transition(id, transition).await {
            tracing::warn!(booking = %id, %transition, error = %e, "transition refused");
            return Err(e.into());
        }

        let committed = self.store.lock().commit_transition(id, transition)?;
        tracing::info!(
            booking = %id,
            %transition,
            status = %committed.status,
            room = %committed.room,
            "booking transition committed"
        );
        Ok(committed)
    }

    /// Validates `draft` locally, creates it remotely and caches the result.
    pub async fn create(&self, draft: &BookingDraft) -> Result<Booking, DeskError> {
        let payload = draft.validate()?;

        let booking = match self.bookings.create(payload).await {
            Ok(booking) => booking,
            Err(e) => {
                tracing::warn!(error = %e, "booking creation refused");
                return Err(e.into());
            }
        };

        tracing::info!(
            booking = %booking.id,
            room = %booking.room_id,
            check_in = %booking.check_in,
            check_out = %booking.check_out,
            "booking created"
        );
        self.store.lock().insert_booking(booking.clone());
        Ok(booking)
    }
}

impl std::fmt::Debug for BookingLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingLifecycle").finish_non_exhaustive()
    }
}
