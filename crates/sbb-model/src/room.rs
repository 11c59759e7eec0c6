//! Rooms
//!
//! A room's status is never set directly: it follows the transitions of the
//! bookings held on it (see [`Transition::room_effect`]).

use crate::booking::Transition;
use crate::error::ParseError;
use crate::ids::{HotelId, RoomId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Room status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    /// Free and clean
    #[default]
    Available,
    /// A guest is in
    Occupied,
    /// The guest left, cleaning pending
    ToClean,
}

impl RoomStatus {
    pub const ALL: [RoomStatus; 3] = [Self::Available, Self::Occupied, Self::ToClean];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Occupied => "OCCUPIED",
            Self::ToClean => "TO_CLEAN",
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == upper)
            .ok_or_else(|| ParseError::RoomStatus(s.to_string()))
    }
}

/// A bookable room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub hotel_id: HotelId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Nightly rate in whole currency units; unpriced rooms read as 0
    #[serde(default)]
    pub base_price: u32,
    #[serde(default)]
    status: RoomStatus,
    #[serde(default)]
    last_cleaned: Option<NaiveDate>,
}

impl Room {
    /// New available room
    #[must_use]
    pub fn new(id: RoomId, hotel_id: HotelId, name: impl Into<String>, base_price: u32) -> Self {
        Self {
            id,
            hotel_id,
            name: name.into(),
            description: String::new(),
            base_price,
            status: RoomStatus::Available,
            last_cleaned: None,
        }
    }

    /// Snapshot of a room the backend reports in `status`
    #[must_use]
    pub fn with_status(mut self, status: RoomStatus) -> Self {
        self.status = status;
        self
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> RoomStatus {
        self.status
    }

    /// Day the room was last certified clean
    #[inline]
    #[must_use]
    pub fn last_cleaned(&self) -> Option<NaiveDate> {
        self.last_cleaned
    }

    /// Applies the side effect of a committed booking transition.
    ///
    /// Returns the new status, or `None` when the transition leaves the room alone.
    pub fn follow(&mut self, transition: Transition, today: NaiveDate) -> Option<RoomStatus> {
        let status = transition.room_effect()?;
        self.status = status;
        if transition == Transition::Complete {
            self.last_cleaned = Some(today);
        }
        Some(status)
    }
}
