//! Occupancy store
//!
//! Single state container for one hotel session. It owns the cached
//! bookings, rooms and closures plus the viewed month; the calendar grid is
//! derived from them and rebuilt synchronously on every change, then
//! published to watchers.
//!
//! Loads are tagged with a [`LoadTicket`]. Starting a new load of a
//! collection supersedes older tickets for it, and results carrying a
//! superseded ticket are dropped.

use crate::calendar::{build_month, CalendarDay};
use crate::error::{DeskError, Entity};
use chrono::NaiveDate;
use sbb_model::{
    Booking, BookingId, BookingStatus, ClosureId, HotelClosure, HotelId, Room, RoomId, RoomStatus,
    Transition, YearMonth,
};
use std::sync::Arc;
use tokio::sync::watch;

/// Shared, immutable grid snapshot
pub type Grid = Arc<[CalendarDay]>;

/// Source collections of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Bookings,
    Rooms,
    Closures,
}

impl Collection {
    const fn slot(self) -> usize {
        match self {
            Self::Bookings => 0,
            Self::Rooms => 1,
            Self::Closures => 2,
        }
    }
}

/// Marks a load in flight for one collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    collection: Collection,
    generation: u64,
}

/// Result of committing a transition to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Committed {
    pub booking: BookingId,
    pub status: BookingStatus,
    pub room: RoomId,
    /// New room status, `None` when the room was untouched or is not cached
    pub room_status: Option<RoomStatus>,
}

/// State container for one hotel session
#[derive(Debug)]
pub struct OccupancyStore {
    hotel: HotelId,
    today: NaiveDate,
    month: YearMonth,
    bookings: Vec<Booking>,
    rooms: Vec<Room>,
    closures: Vec<HotelClosure>,
    generations: [u64; 3],
    grid: Grid,
    publisher: watch::Sender<Grid>,
    rebuilds: u64,
}

impl OccupancyStore {
    /// Empty store viewing the month of `today`
    #[must_use]
    pub fn new(hotel: HotelId, today: NaiveDate) -> Self {
        let month = YearMonth::of(today);
        let grid: Grid = build_month(&[], &[], &[], hotel, month, today).into();
        let (publisher, _) = watch::channel(grid.clone());
        Self {
            hotel,
            today,
            month,
            bookings: Vec::new(),
            rooms: Vec::new(),
            closures: Vec::new(),
            generations: [0; 3],
            grid,
            publisher,
            rebuilds: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn hotel(&self) -> HotelId {
        self.hotel
    }

    #[inline]
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    #[inline]
    #[must_use]
    pub fn month(&self) -> YearMonth {
        self.month
    }

    #[inline]
    #[must_use]
    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    #[inline]
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[inline]
    #[must_use]
    pub fn closures(&self) -> &[HotelClosure] {
        &self.closures
    }

    /// Current grid
    #[inline]
    #[must_use]
    pub fn calendar(&self) -> Grid {
        self.grid.clone()
    }

    /// Number of grid rebuilds since creation
    #[inline]
    #[must_use]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Watch the grid; receivers see every rebuild
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Grid> {
        self.publisher.subscribe()
    }

    #[must_use]
    pub fn find_booking(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    #[must_use]
    pub fn find_room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn find_closure(&self, id: ClosureId) -> Option<&HotelClosure> {
        self.closures.iter().find(|c| c.id == id)
    }

    /// Start a load of `collection`, superseding any load still in flight
    pub fn begin_load(&mut self, collection: Collection) -> LoadTicket {
        let slot = &mut self.generations[collection.slot()];
        *slot += 1;
        LoadTicket {
            collection,
            generation: *slot,
        }
    }

    /// Whether results for `ticket` would still be applied
    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.generations[ticket.collection.slot()] == ticket.generation
    }

    /// Replace bookings if `ticket` is current. Returns whether they were applied.
    pub fn apply_bookings(&mut self, ticket: LoadTicket, bookings: Vec<Booking>) -> bool {
        if !self.accept(ticket, Collection::Bookings) {
            return false;
        }
        self.bookings = bookings;
        self.rebuild();
        true
    }

    /// Replace rooms if `ticket` is current. Rooms of other hotels are dropped.
    pub fn apply_rooms(&mut self, ticket: LoadTicket, rooms: Vec<Room>) -> bool {
        if !self.accept(ticket, Collection::Rooms) {
            return false;
        }
        let hotel = self.hotel;
        self.rooms = rooms.into_iter().filter(|r| r.hotel_id == hotel).collect();
        self.rebuild();
        true
    }

    /// Replace closures if `ticket` is current
    pub fn apply_closures(&mut self, ticket: LoadTicket, closures: Vec<HotelClosure>) -> bool {
        if !self.accept(ticket, Collection::Closures) {
            return false;
        }
        self.closures = closures;
        self.rebuild();
        true
    }

    pub fn set_month(&mut self, month: YearMonth) {
        self.month = month;
        self.rebuild();
    }

    /// Patch the cache after the backend confirmed `transition`.
    ///
    /// A booking already in the target status (a reload landed first) is left
    /// as is and its room is not touched.
    pub fn commit_transition(
        &mut self,
        id: BookingId,
        transition: Transition,
    ) -> Result<Committed, DeskError> {
        let today = self.today;
        let booking = self
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| DeskError::not_found(Entity::Booking, id))?;
        if booking.status == transition.target() {
            tracing::debug!(booking = %id, %transition, "transition already reflected in cache");
            return Ok(Committed {
                booking: id,
                status: booking.status,
                room: booking.room_id,
                room_status: None,
            });
        }
        let status = booking.apply(transition)?;
        let room = booking.room_id;

        let room_status = self
            .rooms
            .iter_mut()
            .find(|r| r.id == room)
            .and_then(|r| r.follow(transition, today));

        self.rebuild();
        Ok(Committed {
            booking: id,
            status,
            room,
            room_status,
        })
    }

    pub fn insert_booking(&mut self, booking: Booking) {
        self.bookings.push(booking);
        self.rebuild();
    }

    pub fn insert_closure(&mut self, closure: HotelClosure) {
        self.closures.push(closure);
        self.rebuild();
    }

    /// Returns whether a closure was removed
    pub fn remove_closure(&mut self, id: ClosureId) -> bool {
        let before = self.closures.len();
        self.closures.retain(|c| c.id != id);
        let removed = self.closures.len() != before;
        if removed {
            self.rebuild();
        }
        removed
    }

    fn accept(&self, ticket: LoadTicket, expected: Collection) -> bool {
        let current = ticket.collection == expected && self.is_current(ticket);
        if !current {
            tracing::debug!(collection = ?expected, "ignoring superseded load");
        }
        current
    }

    fn rebuild(&mut self) {
        self.grid = build_month(
            &self.bookings,
            &self.rooms,
            &self.closures,
            self.hotel,
            self.month,
            self.today,
        )
        .into();
        self.rebuilds += 1;
        self.publisher.send_replace(self.grid.clone());
        tracing::debug!(month = %self.month, cells = self.grid.len(), "calendar rebuilt");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sbb_model::GuestId;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn store() -> OccupancyStore {
        OccupancyStore::new(HotelId(1), d("2025-06-15"))
    }

    fn booking(id: u32, room: u32, status: BookingStatus) -> Booking {
        Booking {
            id: BookingId(id),
            guest_id: GuestId(1),
            room_id: RoomId(room),
            check_in: d("2025-06-10"),
            check_out: d("2025-06-12"),
            price: 100,
            notes: String::new(),
            status,
        }
    }

    fn occupied_on(store: &OccupancyStore, date: &str) -> usize {
        store
            .calendar()
            .iter()
            .find(|c| c.date == d(date))
            .map(|c| c.occupied_rooms)
            .unwrap()
    }

    #[test]
    fn every_change_rebuilds() {
        let mut store = store();
        let t = store.begin_load(Collection::Bookings);
        store.apply_bookings(t, vec![booking(1, 1, BookingStatus::Pending)]);
        store.set_month(store.month().next());
        store.insert_closure(HotelClosure {
            id: ClosureId(1),
            hotel_id: HotelId(1),
            start_date: d("2025-07-01"),
            end_date: d("2025-07-02"),
            reason: String::new(),
        });
        assert_eq!(store.rebuilds(), 3);
    }

    #[test]
    fn superseded_load_is_ignored() {
        let mut store = store();
        let old = store.begin_load(Collection::Bookings);
        let new = store.begin_load(Collection::Bookings);

        assert!(store.apply_bookings(new, vec![booking(1, 1, BookingStatus::Pending)]));
        assert!(!store.apply_bookings(old, Vec::new()));
        assert_eq!(store.bookings().len(), 1);
    }

    #[test]
    fn ticket_of_another_collection_is_ignored() {
        let mut store = store();
        let rooms = store.begin_load(Collection::Rooms);
        assert!(!store.apply_bookings(rooms, vec![booking(1, 1, BookingStatus::Pending)]));
        assert!(store.bookings().is_empty());
    }

    #[test]
    fn loads_of_different_collections_are_independent() {
        let mut store = store();
        let b = store.begin_load(Collection::Bookings);
        let r = store.begin_load(Collection::Rooms);
        assert!(store.is_current(b));
        assert!(store.is_current(r));
    }

    #[test]
    fn foreign_rooms_are_dropped() {
        let mut store = store();
        let t = store.begin_load(Collection::Rooms);
        store.apply_rooms(
            t,
            vec![
                Room::new(RoomId(1), HotelId(1), "101", 80),
                Room::new(RoomId(2), HotelId(2), "201", 80),
            ],
        );
        assert_eq!(store.rooms().len(), 1);
        assert!(store.calendar().iter().all(|c| c.total_rooms == 1));
    }

    #[test]
    fn commit_updates_booking_room_and_grid() {
        let mut store = store();
        let t = store.begin_load(Collection::Rooms);
        store.apply_rooms(t, vec![Room::new(RoomId(1), HotelId(1), "101", 80)]);
        let t = store.begin_load(Collection::Bookings);
        store.apply_bookings(t, vec![booking(1, 1, BookingStatus::Pending)]);
        assert_eq!(occupied_on(&store, "2025-06-10"), 1);

        let committed = store.commit_transition(BookingId(1), Transition::Cancel).unwrap();
        assert_eq!(committed.status, BookingStatus::Canceled);
        assert_eq!(committed.room_status, None);
        assert_eq!(occupied_on(&store, "2025-06-10"), 0);
    }

    #[test]
    fn commit_of_unknown_booking_fails() {
        let mut store = store();
        let err = store.commit_transition(BookingId(5), Transition::Accept).unwrap_err();
        assert!(matches!(err, DeskError::NotFound { entity: Entity::Booking, id: 5 }));
    }

    #[test]
    fn watchers_see_rebuilds() {
        let mut store = store();
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        store.set_month(YearMonth::new(2025, 2).unwrap());
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 35);
    }

    #[test]
    fn remove_unknown_closure_does_not_rebuild() {
        let mut store = store();
        assert!(!store.remove_closure(ClosureId(3)));
        assert_eq!(store.rebuilds(), 0);
    }
}
