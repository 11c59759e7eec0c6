//! Drag range selection over the calendar grid
//!
//! Press on an in-month day, move over other in-month days, release. A
//! release without movement is a plain click. The gesture state is reset on
//! every release whatever the outcome.

use crate::calendar::CalendarDay;
use chrono::NaiveDate;
use sbb_model::DateRange;

/// What a finished gesture asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Plain click: show the day's bookings
    DayDetail(NaiveDate),
    /// Range with no closed day: candidate for a new closure
    Close(DateRange),
    /// Range touching a closed day: candidate for reopening
    Reopen(DateRange),
}

/// Pointer gesture state
#[derive(Debug, Clone, Default)]
pub struct DragSelection {
    dragging: bool,
    moved: bool,
    anchor: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DragSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Pointer pressed on a cell. Ignored outside the viewed month.
    pub fn press(&mut self, day: &CalendarDay) -> bool {
        if !day.is_current_month {
            return false;
        }
        self.dragging = true;
        self.moved = false;
        self.anchor = Some(day.date);
        self.end = Some(day.date);
        true
    }

    /// Pointer entered a cell. Extends the range while dragging over in-month days.
    pub fn hover(&mut self, day: &CalendarDay) -> bool {
        if !self.dragging || !day.is_current_month {
            return false;
        }
        self.moved = true;
        self.end = Some(day.date);
        true
    }

    /// Normalized range of the gesture in progress
    #[must_use]
    pub fn current_range(&self) -> Option<DateRange> {
        let anchor = self.anchor?;
        Some(DateRange::new(anchor, self.end.unwrap_or(anchor)))
    }

    /// Pointer released. `grid` is the calendar the gesture ran over.
    ///
    /// Returns `None` when no gesture was in progress.
    pub fn release(&mut self, grid: &[CalendarDay]) -> Option<SelectionOutcome> {
        let was_dragging = self.dragging;
        let moved = self.moved;
        let range = self.current_range();
        self.reset();

        let range = range.filter(|_| was_dragging)?;
        if !moved {
            return Some(SelectionOutcome::DayDetail(range.from()));
        }

        let touches_closed = grid
            .iter()
            .filter(|c| range.contains(c.date))
            .any(CalendarDay::is_closed);
        Some(if touches_closed {
            SelectionOutcome::Reopen(range)
        } else {
            SelectionOutcome::Close(range)
        })
    }

    /// Drop any gesture in progress
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::ClosureRef;
    use chrono::Datelike;
    use sbb_model::ClosureId;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn cell(date: &str, in_month: bool, closed: bool) -> CalendarDay {
        let date = d(date);
        CalendarDay {
            date,
            day: date.day(),
            is_current_month: in_month,
            is_today: false,
            occupied_rooms: 0,
            total_rooms: 3,
            closure: closed.then(|| ClosureRef {
                id: ClosureId(1),
                reason: String::new(),
            }),
        }
    }

    #[test]
    fn reverse_drag_normalizes() {
        let grid = [
            cell("2025-08-01", true, false),
            cell("2025-08-02", true, false),
            cell("2025-08-03", true, false),
        ];
        let mut sel = DragSelection::new();
        assert!(sel.press(&grid[2]));
        sel.hover(&grid[1]);
        sel.hover(&grid[0]);

        let expected = DateRange::new(d("2025-08-01"), d("2025-08-03"));
        assert_eq!(sel.current_range(), Some(expected));
        assert_eq!(sel.release(&grid), Some(SelectionOutcome::Close(expected)));
        assert!(!sel.is_dragging());
        assert_eq!(sel.current_range(), None);
    }

    #[test]
    fn click_opens_day_detail() {
        let grid = [cell("2025-08-05", true, true)];
        let mut sel = DragSelection::new();
        sel.press(&grid[0]);
        assert_eq!(
            sel.release(&grid),
            Some(SelectionOutcome::DayDetail(d("2025-08-05")))
        );
    }

    #[test]
    fn range_touching_closure_reopens() {
        let grid = [
            cell("2025-07-04", true, false),
            cell("2025-07-05", true, true),
            cell("2025-07-06", true, false),
        ];
        let mut sel = DragSelection::new();
        sel.press(&grid[0]);
        sel.hover(&grid[2]);
        assert_eq!(
            sel.release(&grid),
            Some(SelectionOutcome::Reopen(DateRange::new(d("2025-07-04"), d("2025-07-06"))))
        );
    }

    #[test]
    fn other_month_cells_are_inert() {
        let inside = cell("2025-08-31", true, false);
        let outside = cell("2025-09-01", false, false);
        let mut sel = DragSelection::new();

        assert!(!sel.press(&outside));
        assert!(!sel.is_dragging());

        sel.press(&inside);
        assert!(!sel.hover(&outside));
        assert_eq!(sel.current_range(), Some(DateRange::single(d("2025-08-31"))));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut sel = DragSelection::new();
        assert_eq!(sel.release(&[]), None);
    }

    #[test]
    fn hover_without_press_is_ignored() {
        let mut sel = DragSelection::new();
        assert!(!sel.hover(&cell("2025-08-02", true, false)));
        assert_eq!(sel.current_range(), None);
    }
}
