//! Front-desk boards
//!
//! Listings the desk shows next to the calendar: today's arrivals and
//! departures, the booking list by status and the housekeeping room list.

use chrono::NaiveDate;
use sbb_model::{Booking, BookingStatus, Room, RoomId, RoomStatus};
use std::collections::BTreeMap;

/// Bookings checking in on `day`
#[must_use]
pub fn arrivals_on(bookings: &[Booking], day: NaiveDate) -> Vec<&Booking> {
    bookings.iter().filter(|b| b.check_in == day).collect()
}

/// Bookings checking out on `day`
#[must_use]
pub fn departures_on(bookings: &[Booking], day: NaiveDate) -> Vec<&Booking> {
    bookings.iter().filter(|b| b.check_out == day).collect()
}

/// Booking list filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookingFilter {
    #[default]
    All,
    Status(BookingStatus),
}

impl BookingFilter {
    #[must_use]
    pub fn matches(self, booking: &Booking) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => booking.status == status,
        }
    }
}

/// Bookings passing `filter`, latest check-in first
#[must_use]
pub fn filter_bookings(bookings: &[Booking], filter: BookingFilter) -> Vec<&Booking> {
    let mut out: Vec<&Booking> = bookings.iter().filter(|b| filter.matches(b)).collect();
    out.sort_by(|a, b| b.check_in.cmp(&a.check_in));
    out
}

/// Per-status booking counts; every status is present
#[must_use]
pub fn count_bookings(bookings: &[Booking]) -> BTreeMap<BookingStatus, usize> {
    let mut counts: BTreeMap<BookingStatus, usize> =
        BookingStatus::ALL.into_iter().map(|s| (s, 0)).collect();
    for booking in bookings {
        *counts.entry(booking.status).or_default() += 1;
    }
    counts
}

/// Room list filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoomFilter {
    #[default]
    All,
    Status(RoomStatus),
}

impl RoomFilter {
    #[must_use]
    pub fn matches(self, room: &Room) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => room.status() == status,
        }
    }
}

#[must_use]
pub fn filter_rooms(rooms: &[Room], filter: RoomFilter) -> Vec<&Room> {
    rooms.iter().filter(|r| filter.matches(r)).collect()
}

/// Per-status room counts; every status is present
#[must_use]
pub fn count_rooms(rooms: &[Room]) -> BTreeMap<RoomStatus, usize> {
    let mut counts: BTreeMap<RoomStatus, usize> =
        RoomStatus::ALL.into_iter().map(|s| (s, 0)).collect();
    for room in rooms {
        *counts.entry(room.status()).or_default() += 1;
    }
    counts
}

/// Whether `room` has a booking neither completed nor canceled
#[must_use]
pub fn has_active_booking(bookings: &[Booking], room: RoomId) -> bool {
    bookings
        .iter()
        .any(|b| b.room_id == room && !b.status.is_terminal())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sbb_model::{BookingId, GuestId, HotelId};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn booking(id: u32, room: u32, from: &str, to: &str, status: BookingStatus) -> Booking {
        Booking {
            id: BookingId(id),
            guest_id: GuestId(1),
            room_id: RoomId(room),
            check_in: d(from),
            check_out: d(to),
            price: 100,
            notes: String::new(),
            status,
        }
    }

    fn ledger() -> Vec<Booking> {
        vec![
            booking(1, 1, "2025-06-10", "2025-06-12", BookingStatus::CheckedIn),
            booking(2, 2, "2025-06-12", "2025-06-14", BookingStatus::Pending),
            booking(3, 3, "2025-06-01", "2025-06-12", BookingStatus::CheckedOut),
            booking(4, 1, "2025-05-01", "2025-05-03", BookingStatus::Complete),
        ]
    }

    fn ids(bookings: &[&Booking]) -> Vec<u32> {
        bookings.iter().map(|b| b.id.get()).collect()
    }

    #[test]
    fn arrivals_and_departures() {
        let bookings = ledger();
        assert_eq!(ids(&arrivals_on(&bookings, d("2025-06-12"))), [2]);
        assert_eq!(ids(&departures_on(&bookings, d("2025-06-12"))), [1, 3]);
    }

    #[test]
    fn booking_list_sorted_latest_first() {
        let bookings = ledger();
        assert_eq!(ids(&filter_bookings(&bookings, BookingFilter::All)), [2, 1, 3, 4]);
        assert_eq!(
            ids(&filter_bookings(
                &bookings,
                BookingFilter::Status(BookingStatus::Pending)
            )),
            [2]
        );
    }

    #[test]
    fn counts_include_empty_statuses() {
        let counts = count_bookings(&ledger());
        assert_eq!(counts[&BookingStatus::Canceled], 0);
        assert_eq!(counts[&BookingStatus::CheckedIn], 1);
        assert_eq!(counts.values().sum::<usize>(), 4);
    }

    #[test]
    fn room_board() {
        let rooms = vec![
            Room::new(RoomId(1), HotelId(1), "101", 80).with_status(RoomStatus::Occupied),
            Room::new(RoomId(2), HotelId(1), "102", 80),
            Room::new(RoomId(3), HotelId(1), "103", 80).with_status(RoomStatus::ToClean),
        ];
        let dirty = filter_rooms(&rooms, RoomFilter::Status(RoomStatus::ToClean));
        assert_eq!(dirty.len(), 1);
        assert_eq!(dirty[0].id, RoomId(3));
        assert_eq!(filter_rooms(&rooms, RoomFilter::All).len(), 3);
        assert_eq!(count_rooms(&rooms)[&RoomStatus::Available], 1);
    }

    #[test]
    fn active_booking_ignores_terminal_statuses() {
        let bookings = ledger();
        assert!(has_active_booking(&bookings, RoomId(1)));
        assert!(has_active_booking(&bookings, RoomId(3)));
        assert!(!has_active_booking(&bookings, RoomId(4)));
        assert!(!has_active_booking(
            &[booking(9, 4, "2025-06-01", "2025-06-02", BookingStatus::Canceled)],
            RoomId(4)
        ));
    }
}
