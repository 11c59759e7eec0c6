//! Testing utilities for SBB workspace
//!
//! Shared fixtures: date parsing, record builders and a seeded backend.

#![allow(missing_docs)]

use chrono::NaiveDate;
use sbb_core::{DeskConfig, Gateways, HotelDesk, InMemoryBackend};
use sbb_model::{
    Booking, BookingId, BookingStatus, ClosureId, Guest, GuestId, HotelClosure, HotelId,
    NewGuest, Room, RoomId,
};
use std::sync::Arc;

/// The hotel every fixture belongs to
pub const HOTEL: HotelId = HotelId(1);

/// Parse `YYYY-MM-DD`
pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn booking(id: u32, room: u32, from: &str, to: &str, status: BookingStatus) -> Booking {
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

pub fn room(id: u32) -> Room {
    Room::new(RoomId(id), HOTEL, format!("{}", 100 + id), 90)
}

pub fn closure(id: u32, from: &str, to: &str) -> HotelClosure {
    HotelClosure {
        id: ClosureId(id),
        hotel_id: HOTEL,
        start_date: d(from),
        end_date: d(to),
        reason: "maintenance".to_string(),
    }
}

pub fn guest(id: u32, first: &str, last: &str) -> Guest {
    NewGuest::new(first, last).into_guest(GuestId(id))
}

/// Backend with three rooms in [`HOTEL`], one room elsewhere and three guests
pub fn seeded_backend(today: &str) -> Arc<InMemoryBackend> {
    let backend = InMemoryBackend::new(d(today));
    for id in 1..=3 {
        backend.add_room(room(id));
    }
    backend.add_room(Room::new(RoomId(9), HotelId(2), "901", 120));
    backend.add_guest(guest(1, "Anna", "Rossi"));
    backend.add_guest(guest(2, "Marco", "Bianchi"));
    backend.add_guest(guest(3, "Giovanna", "Verdi"));
    Arc::new(backend)
}

/// Desk session for [`HOTEL`] over `backend`, not yet loaded
pub fn setup_desk(backend: Arc<InMemoryBackend>, today: &str) -> HotelDesk {
    let config = DeskConfig::new().with_hotel(HOTEL).with_today(d(today));
    HotelDesk::new(config, Gateways::shared(backend))
}

/// Desk session loaded from `backend`
pub async fn loaded_desk(backend: Arc<InMemoryBackend>, today: &str) -> HotelDesk {
    let desk = setup_desk(backend, today);
    desk.load().await.unwrap();
    desk
}
