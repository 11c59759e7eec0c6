//! Front-desk session
//!
//! [`HotelDesk`] wires the collaborators, the occupancy store, the drag
//! gesture, the guest register and the booking lifecycle for one hotel.
//! Every operation either completes and updates the cache, or fails and
//! leaves it as it was.

use crate::boards::{self, BookingFilter, RoomFilter};
use crate::calendar::{active_bookings_on, classify, CalendarDay, DayClass};
use crate::config::DeskConfig;
use crate::error::{DeskError, Entity, ValidationError};
use crate::guests::GuestMatcher;
use crate::lifecycle::BookingLifecycle;
use crate::ports::Gateways;
use crate::reservations::BookingDraft;
use crate::selection::{DragSelection, SelectionOutcome};
use crate::store::{Collection, Committed, Grid, OccupancyStore};
use chrono::NaiveDate;
use parking_lot::Mutex;
use sbb_model::{
    Booking, BookingId, BookingStatus, ClosureId, DateRange, HotelClosure, HotelId, NewClosure,
    Room, RoomId, RoomStatus, Transition, YearMonth,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;

/// One hotel's front-desk session
#[derive(Debug)]
pub struct HotelDesk {
    config: DeskConfig,
    gateways: Gateways,
    store: Arc<Mutex<OccupancyStore>>,
    selection: Mutex<DragSelection>,
    guests: GuestMatcher,
    lifecycle: BookingLifecycle,
}

impl HotelDesk {
    /// Create a session. Nothing is fetched until [`HotelDesk::load`].
    #[must_use]
    pub fn new(config: DeskConfig, gateways: Gateways) -> Self {
        let store = Arc::new(Mutex::new(OccupancyStore::new(config.hotel_id, config.today())));
        Self {
            guests: GuestMatcher::new(gateways.guests.clone()),
            lifecycle: BookingLifecycle::new(store.clone(), gateways.bookings.clone()),
            selection: Mutex::new(DragSelection::new()),
            store,
            gateways,
            config,
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn hotel(&self) -> HotelId {
        self.config.hotel_id
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.store.lock().today()
    }

    /// Fetch bookings, rooms, closures and guests concurrently.
    ///
    /// Each collection is applied as soon as it arrives; the first failure is
    /// returned once every fetch has finished.
    pub async fn load(&self) -> Result<(), DeskError> {
        let hotel = self.hotel();
        let (bookings_ticket, rooms_ticket, closures_ticket) = {
            let mut store = self.store.lock();
            (
                store.begin_load(Collection::Bookings),
                store.begin_load(Collection::Rooms),
                store.begin_load(Collection::Closures),
            )
        };

        let (bookings, rooms, closures, guests) = futures::join!(
            self.gateways.bookings.by_hotel(hotel),
            self.gateways.rooms.by_hotel(hotel),
            self.gateways.closures.by_hotel(hotel),
            self.guests.load(),
        );

        let mut first_error = None;
        {
            let mut store = self.store.lock();
            match bookings {
                Ok(list) => {
                    store.apply_bookings(bookings_ticket, list);
                }
                Err(e) => first_error = first_error.or(Some(DeskError::from(e))),
            }
            match rooms {
                Ok(list) => {
                    store.apply_rooms(rooms_ticket, list);
                }
                Err(e) => first_error = first_error.or(Some(DeskError::from(e))),
            }
            match closures {
                Ok(list) => {
                    store.apply_closures(closures_ticket, list);
                }
                Err(e) => first_error = first_error.or(Some(DeskError::from(e))),
            }
        }
        if let Err(e) = guests {
            first_error = first_error.or(Some(e));
        }

        match first_error {
            Some(e) => {
                tracing::warn!(%hotel, error = %e, "desk load incomplete");
                Err(e)
            }
            None => {
                tracing::info!(%hotel, "desk loaded");
                Ok(())
            }
        }
    }

    /// Fetch one collection again
    pub async fn refresh(&self, collection: Collection) -> Result<(), DeskError> {
        let hotel = self.hotel();
        let ticket = self.store.lock().begin_load(collection);
        match collection {
            Collection::Bookings => {
                let list = self.gateways.bookings.by_hotel(hotel).await?;
                self.store.lock().apply_bookings(ticket, list);
            }
            Collection::Rooms => {
                let list = self.gateways.rooms.by_hotel(hotel).await?;
                self.store.lock().apply_rooms(ticket, list);
            }
            Collection::Closures => {
                let list = self.gateways.closures.by_hotel(hotel).await?;
                self.store.lock().apply_closures(ticket, list);
            }
        }
        Ok(())
    }

    // Calendar view

    /// Current grid
    #[must_use]
    pub fn calendar(&self) -> Grid {
        self.store.lock().calendar()
    }

    /// Watch grid rebuilds
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Grid> {
        self.store.lock().subscribe()
    }

    #[must_use]
    pub fn month(&self) -> YearMonth {
        self.store.lock().month()
    }

    /// Heading of the viewed month, e.g. `June 2025`
    #[must_use]
    pub fn month_label(&self) -> String {
        self.month().label()
    }

    pub fn set_month(&self, month: YearMonth) {
        self.selection.lock().reset();
        self.store.lock().set_month(month);
    }

    pub fn prev_month(&self) {
        self.set_month(self.month().prev());
    }

    pub fn next_month(&self) {
        self.set_month(self.month().next());
    }

    pub fn go_to_today(&self) {
        self.set_month(YearMonth::of(self.today()));
    }

    /// Rendering class of `date`, `None` when it is not on the grid
    #[must_use]
    pub fn day_class(&self, date: NaiveDate) -> Option<DayClass> {
        let selecting = self.selecting();
        self.cell(date).map(|day| classify(&day, selecting))
    }

    /// Active bookings holding a room on `date`
    #[must_use]
    pub fn day_detail(&self, date: NaiveDate) -> Vec<Booking> {
        let store = self.store.lock();
        active_bookings_on(store.bookings(), date)
            .into_iter()
            .cloned()
            .collect()
    }

    // Pointer gesture

    pub fn press(&self, date: NaiveDate) -> bool {
        self.cell(date)
            .is_some_and(|day| self.selection.lock().press(&day))
    }

    pub fn hover(&self, date: NaiveDate) -> bool {
        self.cell(date)
            .is_some_and(|day| self.selection.lock().hover(&day))
    }

    /// Finish the gesture. The selection is cleared whatever the outcome.
    pub fn release(&self) -> Option<SelectionOutcome> {
        let grid = self.calendar();
        self.selection.lock().release(&grid)
    }

    /// Range of the gesture in progress
    #[must_use]
    pub fn selecting(&self) -> Option<DateRange> {
        let selection = self.selection.lock();
        if selection.is_dragging() {
            selection.current_range()
        } else {
            None
        }
    }

    fn cell(&self, date: NaiveDate) -> Option<CalendarDay> {
        self.calendar().iter().find(|c| c.date == date).cloned()
    }

    // Booking lifecycle

    pub async fn accept(&self, id: BookingId) -> Result<Committed, DeskError> {
        self.lifecycle.accept(id).await
    }

    pub async fn cancel(&self, id: BookingId) -> Result<Committed, DeskError> {
        self.lifecycle.cancel(id).await
    }

    pub async fn checkout(&self, id: BookingId) -> Result<Committed, DeskError> {
        self.lifecycle.checkout(id).await
    }

    pub async fn complete(&self, id: BookingId) -> Result<Committed, DeskError> {
        self.lifecycle.complete(id).await
    }

    pub async fn apply(&self, id: BookingId, transition: Transition) -> Result<Committed, DeskError> {
        self.lifecycle.apply(id, transition).await
    }

    /// Reservation form for a cached room, staying from today to tomorrow
    pub fn draft_for(&self, room: RoomId) -> Result<BookingDraft, DeskError> {
        let store = self.store.lock();
        let room = store
            .find_room(room)
            .ok_or_else(|| DeskError::not_found(Entity::Room, room))?;
        Ok(BookingDraft::for_room(room).check_in(store.today()))
    }

    pub async fn create_booking(&self, draft: &BookingDraft) -> Result<Booking, DeskError> {
        self.lifecycle.create(draft).await
    }

    // Closures

    /// Close `range`. The created closure is added to the cache.
    pub async fn close_range(
        &self,
        range: DateRange,
        reason: impl Into<String>,
    ) -> Result<HotelClosure, DeskError> {
        let payload = NewClosure::new(self.hotel(), range, reason);
        let closure = self.gateways.closures.create(payload).await.map_err(|e| {
            tracing::warn!(%range, error = %e, "closure refused");
            e
        })?;
        tracing::info!(closure = %closure.id, %range, "hotel closed");
        self.store.lock().insert_closure(closure.clone());
        Ok(closure)
    }

    /// Reopen `range`, then fetch closures again to pick up the carved result.
    pub async fn reopen_range(&self, range: DateRange) -> Result<(), DeskError> {
        self.gateways
            .closures
            .reopen(self.hotel(), range)
            .await
            .map_err(|e| {
                tracing::warn!(%range, error = %e, "reopen refused");
                e
            })?;
        tracing::info!(%range, "hotel reopened");
        self.refresh(Collection::Closures).await
    }

    pub async fn reopen_day(&self, date: NaiveDate) -> Result<(), DeskError> {
        self.reopen_range(DateRange::single(date)).await
    }

    /// Remove a whole closure
    pub async fn delete_closure(&self, id: ClosureId) -> Result<(), DeskError> {
        if self.store.lock().find_closure(id).is_none() {
            return Err(DeskError::not_found(Entity::Closure, id));
        }
        self.gateways.closures.delete(id).await.map_err(|e| {
            tracing::warn!(closure = %id, error = %e, "closure deletion refused");
            e
        })?;
        tracing::info!(closure = %id, "closure deleted");
        self.store.lock().remove_closure(id);
        Ok(())
    }

    // Rooms

    /// Rooms with no active booking over the stay `[check_in, check_out)`
    pub async fn free_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Vec<Room>, DeskError> {
        if check_out <= check_in {
            return Err(ValidationError::StayNotOrdered {
                check_in,
                check_out,
            }
            .into());
        }
        Ok(self
            .gateways
            .rooms
            .free_rooms(self.hotel(), check_in, check_out)
            .await?)
    }

    // Guests

    #[inline]
    #[must_use]
    pub fn guests(&self) -> &GuestMatcher {
        &self.guests
    }

    // Boards

    #[must_use]
    pub fn arrivals_today(&self) -> Vec<Booking> {
        let store = self.store.lock();
        boards::arrivals_on(store.bookings(), store.today())
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn departures_today(&self) -> Vec<Booking> {
        let store = self.store.lock();
        boards::departures_on(store.bookings(), store.today())
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn bookings(&self, filter: BookingFilter) -> Vec<Booking> {
        let store = self.store.lock();
        boards::filter_bookings(store.bookings(), filter)
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn booking_counts(&self) -> BTreeMap<BookingStatus, usize> {
        boards::count_bookings(self.store.lock().bookings())
    }

    #[must_use]
    pub fn rooms(&self, filter: RoomFilter) -> Vec<Room> {
        let store = self.store.lock();
        boards::filter_rooms(store.rooms(), filter)
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn room_counts(&self) -> BTreeMap<RoomStatus, usize> {
        boards::count_rooms(self.store.lock().rooms())
    }

    #[must_use]
    pub fn closures(&self) -> Vec<HotelClosure> {
        self.store.lock().closures().to_vec()
    }
}
