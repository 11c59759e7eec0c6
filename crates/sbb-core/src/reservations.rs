//! Booking form state
//!
//! A [`BookingDraft`] collects the fields of the reservation form as the
//! clerk fills them in. Nothing is checked until [`BookingDraft::validate`].
//!
//! Prices are whole currency units per night, the same unit as
//! [`Room::base_price`] and [`sbb_model::Booking::price`].

use crate::error::ValidationError;
use chrono::NaiveDate;
use sbb_model::{GuestId, NewBooking, Room, RoomId};

/// Reservation form contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    pub guest_id: Option<GuestId>,
    pub room_id: Option<RoomId>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    /// As typed; may be out of range
    pub price: i64,
    pub notes: String,
}

impl BookingDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Form opened on `room`: price prefilled from its nightly rate
    #[must_use]
    pub fn for_room(room: &Room) -> Self {
        Self {
            room_id: Some(room.id),
            price: i64::from(room.base_price),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn guest(mut self, guest: GuestId) -> Self {
        self.guest_id = Some(guest);
        self
    }

    #[must_use]
    pub fn room(mut self, room: RoomId) -> Self {
        self.room_id = Some(room);
        self
    }

    #[must_use]
    pub fn stay(mut self, check_in: NaiveDate, check_out: NaiveDate) -> Self {
        self.check_in = Some(check_in);
        self.check_out = Some(check_out);
        self
    }

    /// Sets check-in. A check-out that is missing or not after it moves to the next day.
    #[must_use]
    pub fn check_in(mut self, day: NaiveDate) -> Self {
        self.check_in = Some(day);
        if !matches!(self.check_out, Some(out) if out > day) {
            self.check_out = day.succ_opt();
        }
        self
    }

    #[must_use]
    pub fn price(mut self, price: i64) -> Self {
        self.price = price;
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Nights between the dates; 0 until both are set and ordered
    #[must_use]
    pub fn nights(&self) -> i64 {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => (check_out - check_in).num_days().max(0),
            _ => 0,
        }
    }

    /// Nightly price times nights
    #[must_use]
    pub fn total_cost(&self) -> i64 {
        self.price.saturating_mul(self.nights())
    }

    /// Checks the form and builds the creation payload.
    ///
    /// Errors are reported in form order: guest, room, dates, price.
    pub fn validate(&self) -> Result<NewBooking, ValidationError> {
        let guest_id = self.guest_id.ok_or(ValidationError::MissingGuest)?;
        let room_id = self.room_id.ok_or(ValidationError::MissingRoom)?;
        let (Some(check_in), Some(check_out)) = (self.check_in, self.check_out) else {
            return Err(ValidationError::MissingDates);
        };
        if check_out <= check_in {
            return Err(ValidationError::StayNotOrdered {
                check_in,
                check_out,
            });
        }
        let price = u32::try_from(self.price).map_err(|_| ValidationError::InvalidPrice(self.price))?;

        Ok(NewBooking {
            guest_id,
            room_id,
            check_in,
            check_out,
            price,
            notes: self.notes.trim().to_string(),
        })
    }
}
