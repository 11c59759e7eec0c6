//! In-memory backend
//!
//! Implements every collaborator over a [`Snapshot`] held in memory, with
//! the server-side rules of the hotel backend: transitions are re-validated
//! and update booking and room together, closures are checked before being
//! stored, and reopening carves overlapping closures.

use crate::config::BackendRules;
use crate::error::RemoteError;
use crate::ports::{BookingGateway, ClosureGateway, GuestGateway, RemoteResult, RoomGateway};
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use sbb_model::{
    carve, validate_transition, Booking, BookingId, ClosureId, DateRange, Guest, GuestId,
    HotelClosure, HotelId, NewBooking, NewClosure, NewGuest, Room, RoomId, Transition,
};
use serde::{Deserialize, Serialize};

/// Every record the backend holds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub bookings: Vec<Booking>,
    pub rooms: Vec<Room>,
    pub closures: Vec<HotelClosure>,
    pub guests: Vec<Guest>,
}

impl Snapshot {
    fn hotel_of(&self, room: RoomId) -> Option<HotelId> {
        self.rooms.iter().find(|r| r.id == room).map(|r| r.hotel_id)
    }

    fn next_booking_id(&self) -> RemoteResult<BookingId> {
        bump(self.bookings.iter().map(|b| b.id.get()).max().unwrap_or(0)).map(BookingId)
    }

    fn next_closure_id(&self) -> RemoteResult<ClosureId> {
        bump(self.closures.iter().map(|c| c.id.get()).max().unwrap_or(0)).map(ClosureId)
    }

    fn next_guest_id(&self) -> RemoteResult<GuestId> {
        bump(self.guests.iter().map(|g| g.id.get()).max().unwrap_or(0)).map(GuestId)
    }
}

/// Id following `max`
fn bump(max: u32) -> RemoteResult<u32> {
    max.checked_add(1)
        .ok_or_else(|| RemoteError::rejected("id space exhausted"))
}

#[derive(Debug, Default)]
struct Ledger {
    data: Snapshot,
    fail_next: Option<RemoteError>,
}

impl Ledger {
    fn check(&mut self) -> RemoteResult<()> {
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Backend living in process memory
#[derive(Debug)]
pub struct InMemoryBackend {
    ledger: Mutex<Ledger>,
    rules: BackendRules,
    today: NaiveDate,
}

impl InMemoryBackend {
    /// Empty backend with default rules
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self::from_snapshot(Snapshot::default(), today)
    }

    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot, today: NaiveDate) -> Self {
        Self {
            ledger: Mutex::new(Ledger {
                data: snapshot,
                fail_next: None,
            }),
            rules: BackendRules::default(),
            today,
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: BackendRules) -> Self {
        self.rules = rules;
        self
    }

    /// Copy of everything stored
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.ledger.lock().data.clone()
    }

    /// Make the next call fail with `err`
    pub fn fail_next(&self, err: RemoteError) {
        self.ledger.lock().fail_next = Some(err);
    }

    /// Seed a room, bypassing every rule
    pub fn add_room(&self, room: Room) {
        self.ledger.lock().data.rooms.push(room);
    }

    /// Seed a booking, bypassing every rule
    pub fn add_booking(&self, booking: Booking) {
        self.ledger.lock().data.bookings.push(booking);
    }

    /// Seed a closure, bypassing every rule
    pub fn add_closure(&self, closure: HotelClosure) {
        self.ledger.lock().data.closures.push(closure);
    }

    /// Seed a guest
    pub fn add_guest(&self, guest: Guest) {
        self.ledger.lock().data.guests.push(guest);
    }

    fn check_closure(&self, data: &Snapshot, closure: &NewClosure) -> RemoteResult<()> {
        if self.rules.forbid_past_closures
            && (closure.start_date < self.today || closure.end_date < self.today)
        {
            return Err(RemoteError::rejected(
                "cannot close dates in the past: start and end must not be before today",
            ));
        }
        if closure.end_date < closure.start_date {
            return Err(RemoteError::rejected("end date cannot be before start date"));
        }
        let range = DateRange::new(closure.start_date, closure.end_date);
        if let Some(existing) = data
            .closures
            .iter()
            .find(|c| c.hotel_id == closure.hotel_id && c.range().overlaps(&range))
        {
            return Err(RemoteError::rejected(format!(
                "dates overlap closure {} ({})",
                existing.id,
                existing.range()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl BookingGateway for InMemoryBackend {
    async fn by_hotel(&self, hotel: HotelId) -> RemoteResult<Vec<Booking>> {
        let mut ledger = self.ledger.lock();
        ledger.check()?;
        let data = &ledger.data;
        Ok(data
            .bookings
            .iter()
            .filter(|b| data.hotel_of(b.room_id) == Some(hotel))
            .cloned()
            .collect())
    }

    async fn by_range(&self, hotel: HotelId, range: DateRange) -> RemoteResult<Vec<Booking>> {
        let mut ledger = self.ledger.lock();
        ledger.check()?;
        let data = &ledger.data;
        Ok(data
            .bookings
            .iter()
            .filter(|b| data.hotel_of(b.room_id) == Some(hotel))
            .filter(|b| b.check_in <= range.to() && b.check_out > range.from())
            .cloned()
            .collect())
    }

    async fn apply_transition(&self, id: BookingId, transition: Transition) -> RemoteResult<()> {
        let mut ledger = self.ledger.lock();
        ledger.check()?;
        let data = &mut ledger.data;

        let booking = data
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| RemoteError::not_found(format!("booking not found with id: {id}")))?;
        validate_transition(booking.status, transition)
            .map_err(|e| RemoteError::rejected(e.to_string()))?;
        if transition == Transition::Checkout
            && self.rules.forbid_early_checkout
            && self.today < booking.check_out
        {
            return Err(RemoteError::rejected(format!(
                "check-out not allowed before departure date ({})",
                booking.check_out
            )));
        }

        let status = booking.apply(transition).map_err(|e| RemoteError::rejected(e.to_string()))?;
        let room = booking.room_id;
        if let Some(r) = data.rooms.iter_mut().find(|r| r.id == room) {
            r.follow(transition, self.today);
        }
        tracing::debug!(booking = %id, %status, "backend applied transition");
        Ok(())
    }

    async fn create(&self, booking: NewBooking) -> RemoteResult<Booking> {
        let mut ledger = self.ledger.lock();
        ledger.check()?;
        let data = &mut ledger.data;

        if data.hotel_of(booking.room_id).is_none() {
            return Err(RemoteError::not_found(format!(
                "room not found with id: {}",
                booking.room_id
            )));
        }
        if booking.check_out <= booking.check_in {
            return Err(RemoteError::rejected("check-out must be after check-in"));
        }
        let created = booking.into_booking(data.next_booking_id()?);
        data.bookings.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl RoomGateway for InMemoryBackend {
    async fn by_hotel(&self, hotel: HotelId) -> RemoteResult<Vec<Room>> {
        let mut ledger = self.ledger.lock();
        ledger.check()?;
        Ok(ledger
            .data
            .rooms
            .iter()
            .filter(|r| r.hotel_id == hotel)
            .cloned()
            .collect())
    }

    async fn free_rooms(
        &self,
        hotel: HotelId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> RemoteResult<Vec<Room>> {
        let mut ledger = self.ledger.lock();
        ledger.check()?;
        if check_out <= check_in {
            return Err(RemoteError::rejected("check-out must be after check-in"));
        }
        let data = &ledger.data;
        Ok(data
            .rooms
            .iter()
            .filter(|r| r.hotel_id == hotel)
            .filter(|r| {
                !data.bookings.iter().any(|b| {
                    b.room_id == r.id
                        && b.status.is_active()
                        && b.overlaps_stay(check_in, check_out)
                })
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ClosureGateway for InMemoryBackend {
    async fn by_hotel(&self, hotel: HotelId) -> RemoteResult<Vec<HotelClosure>> {
        let mut ledger = self.ledger.lock();
        ledger.check()?;
        Ok(ledger
            .data
            .closures
            .iter()
            .filter(|c| c.hotel_id == hotel)
            .cloned()
            .collect())
    }

    async fn create(&self, closure: NewClosure) -> RemoteResult<HotelClosure> {
        let mut ledger = self.ledger.lock();
        ledger.check()?;
        self.check_closure(&ledger.data, &closure)?;

        let data = &mut ledger.data;
        let created = closure.into_closure(data.next_closure_id()?);
        data.closures.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: ClosureId) -> RemoteResult<()> {
        let mut ledger = self.ledger.lock();
        ledger.check()?;
        let closures = &mut ledger.data.closures;
        let before = closures.len();
        closures.retain(|c| c.id != id);
        if closures.len() == before {
            return Err(RemoteError::not_found(format!("closure not found with id: {id}")));
        }
        Ok(())
    }

    async fn reopen(&self, hotel: HotelId, range: DateRange) -> RemoteResult<()> {
        let mut ledger = self.ledger.lock();
        ledger.check()?;
        let data = &mut ledger.data;

        let own: Vec<HotelClosure> = data
            .closures
            .iter()
            .filter(|c| c.hotel_id == hotel)
            .cloned()
            .collect();
        let edits = carve(&own, range);

        // ids are allocated before anything is touched
        let mut next = data.closures.iter().map(|c| c.id.get()).max().unwrap_or(0);
        let mut tails = Vec::with_capacity(edits.created.len());
        for new in edits.created {
            next = bump(next)?;
            tails.push(new.into_closure(ClosureId(next)));
        }

        data.closures.retain(|c| !edits.deleted.contains(&c.id));
        for updated in edits.updated {
            if let Some(slot) = data.closures.iter_mut().find(|c| c.id == updated.id) {
                *slot = updated;
            }
        }
        data.closures.extend(tails);
        tracing::debug!(%hotel, %range, "backend reopened range");
        Ok(())
    }
}

#[async_trait]
impl GuestGateway for InMemoryBackend {
    async fn all(&self) -> RemoteResult<Vec<Guest>> {
        let mut ledger = self.ledger.lock();
        ledger.check()?;
        Ok(ledger.data.guests.clone())
    }

    async fn create(&self, guest: NewGuest) -> RemoteResult<Guest> {
        let mut ledger = self.ledger.lock();
        ledger.check()?;
        let data = &mut ledger.data;
        let created = guest.into_guest(data.next_guest_id()?);
        data.guests.push(created.clone());
        Ok(created)
    }
}
