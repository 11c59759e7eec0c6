//! Availability calendar
//!
//! The month grid is a pure function of bookings, rooms, closures, the
//! viewed month and today. Weeks start on Monday; the grid is padded with
//! days of the neighbouring months up to a whole number of weeks.

use chrono::{Datelike, Days, NaiveDate};
use sbb_model::{Booking, ClosureId, DateRange, HotelClosure, HotelId, Room, RoomId, YearMonth};
use serde::Serialize;
use std::collections::BTreeSet;

/// One cell of the month grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Day of month, 1-31
    pub day: u32,
    pub is_current_month: bool,
    pub is_today: bool,
    /// Distinct rooms held by active bookings on this day
    pub occupied_rooms: usize,
    /// Rooms of the hotel
    pub total_rooms: usize,
    /// Closure covering this day, if any
    pub closure: Option<ClosureRef>,
}

impl CalendarDay {
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closure.is_some()
    }

    #[inline]
    #[must_use]
    pub fn free_rooms(&self) -> usize {
        self.total_rooms.saturating_sub(self.occupied_rooms)
    }
}

/// Reference to the closure covering a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosureRef {
    pub id: ClosureId,
    pub reason: String,
}

/// Rendering class of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayClass {
    /// Outside the viewed month
    Other,
    /// Inside an in-progress drag selection
    Selecting,
    /// Hotel closed
    Closed,
    /// Every room taken
    Full,
    /// Some rooms taken
    Partial,
    /// Nothing to highlight
    Neutral,
}

impl DayClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Other => "other",
            Self::Selecting => "selecting",
            Self::Closed => "closed",
            Self::Full => "full",
            Self::Partial => "partial",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for DayClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the grid for `month`.
///
/// The result always holds a multiple of 7 cells (35 or 42, 28 for a
/// February starting on Monday in a non-leap year).
#[must_use]
pub fn build_month(
    bookings: &[Booking],
    rooms: &[Room],
    closures: &[HotelClosure],
    hotel: HotelId,
    month: YearMonth,
    today: NaiveDate,
) -> Vec<CalendarDay> {
    let first = month.first_day();
    let padding = first.weekday().num_days_from_monday();
    let cells = (padding + month.days_in_month()).div_ceil(7) * 7;
    let start = first
        .checked_sub_days(Days::new(u64::from(padding)))
        .unwrap_or(first);

    let total_rooms = rooms.iter().filter(|r| r.hotel_id == hotel).count();
    let active: Vec<&Booking> = bookings.iter().filter(|b| b.status.is_active()).collect();

    start
        .iter_days()
        .take(cells as usize)
        .map(|date| CalendarDay {
            date,
            day: date.day(),
            is_current_month: month.contains(date),
            is_today: date == today,
            occupied_rooms: distinct_rooms(active.iter().copied(), date),
            total_rooms,
            closure: closures.iter().find(|c| c.covers(date)).map(|c| ClosureRef {
                id: c.id,
                reason: c.reason.clone(),
            }),
        })
        .collect()
}

/// Classifies a cell. Earlier rules win.
#[must_use]
pub fn classify(day: &CalendarDay, selection: Option<DateRange>) -> DayClass {
    if !day.is_current_month {
        return DayClass::Other;
    }
    if selection.is_some_and(|range| range.contains(day.date)) {
        return DayClass::Selecting;
    }
    if day.is_closed() {
        return DayClass::Closed;
    }
    if day.total_rooms == 0 {
        return DayClass::Neutral;
    }
    if day.occupied_rooms >= day.total_rooms {
        return DayClass::Full;
    }
    if day.occupied_rooms > 0 {
        return DayClass::Partial;
    }
    DayClass::Neutral
}

/// Active bookings holding a room on `day` (the day-detail listing)
#[must_use]
pub fn active_bookings_on(bookings: &[Booking], day: NaiveDate) -> Vec<&Booking> {
    bookings.iter().filter(|b| b.holds_room_on(day)).collect()
}

/// Distinct rooms held by active bookings on `day`
#[must_use]
pub fn occupied_rooms_on(bookings: &[Booking], day: NaiveDate) -> usize {
    distinct_rooms(bookings.iter().filter(|b| b.status.is_active()), day)
}

fn distinct_rooms<'a>(active: impl Iterator<Item = &'a Booking>, day: NaiveDate) -> usize {
    active
        .filter(|b| b.occupies(day))
        .map(|b| b.room_id)
        .collect::<BTreeSet<RoomId>>()
        .len()
}
