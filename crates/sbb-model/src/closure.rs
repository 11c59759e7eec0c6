//! Hotel closures
//!
//! Closures of one hotel never overlap. Reopening a range carves every
//! overlapping closure: a closure inside the range is deleted, one wrapping
//! it is split in two, and one straddling an edge is trimmed.

use crate::dates::DateRange;
use crate::ids::{ClosureId, HotelId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A contiguous inclusive period during which the hotel accepts no bookings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelClosure {
    pub id: ClosureId,
    pub hotel_id: HotelId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: String,
}

impl HotelClosure {
    #[inline]
    #[must_use]
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    /// Inclusive on both ends
    #[inline]
    #[must_use]
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

/// Payload for creating a closure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClosure {
    pub hotel_id: HotelId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: String,
}

impl NewClosure {
    #[must_use]
    pub fn new(hotel_id: HotelId, range: DateRange, reason: impl Into<String>) -> Self {
        Self {
            hotel_id,
            start_date: range.from(),
            end_date: range.to(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn into_closure(self, id: ClosureId) -> HotelClosure {
        HotelClosure {
            id,
            hotel_id: self.hotel_id,
            start_date: self.start_date,
            end_date: self.end_date,
            reason: self.reason,
        }
    }
}

/// Edits needed to reopen a range
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosureCarve {
    /// Closures entirely inside the range
    pub deleted: Vec<ClosureId>,
    /// Closures shortened at the head or tail
    pub updated: Vec<HotelClosure>,
    /// Tails split off closures that wrapped the range
    pub created: Vec<NewClosure>,
}

impl ClosureCarve {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.updated.is_empty() && self.created.is_empty()
    }
}

/// Computes the edits that reopen `range` against `closures`.
///
/// Closures not overlapping the range are left out of the result.
#[must_use]
pub fn carve(closures: &[HotelClosure], range: DateRange) -> ClosureCarve {
    let mut out = ClosureCarve::default();

    for c in closures.iter().filter(|c| c.range().overlaps(&range)) {
        let starts_before = c.start_date < range.from();
        let ends_after = c.end_date > range.to();
        // `starts_before` guarantees a predecessor of `from`, `ends_after` a successor of `to`
        let head_end = range.from().pred_opt();
        let tail_start = range.to().succ_opt();

        match (starts_before, ends_after, head_end, tail_start) {
            (true, true, Some(head_end), Some(tail_start)) => {
                out.created.push(NewClosure {
                    hotel_id: c.hotel_id,
                    start_date: tail_start,
                    end_date: c.end_date,
                    reason: c.reason.clone(),
                });
                out.updated.push(HotelClosure {
                    end_date: head_end,
                    ..c.clone()
                });
            }
            (true, false, Some(head_end), _) => out.updated.push(HotelClosure {
                end_date: head_end,
                ..c.clone()
            }),
            (false, true, _, Some(tail_start)) => out.updated.push(HotelClosure {
                start_date: tail_start,
                ..c.clone()
            }),
            _ => out.deleted.push(c.id),
        }
    }

    out
}
