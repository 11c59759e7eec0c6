use pretty_assertions::assert_eq;
use sbb_core::{DayClass, SelectionOutcome};
use sbb_model::{BookingId, BookingStatus, DateRange, YearMonth};
use sbb_test_utils::{booking, d, loaded_desk, seeded_backend};

#[tokio::test]
async fn test_june_stay_occupancy() {
    let backend = seeded_backend("2025-06-01");
    backend.add_booking(booking(1, 1, "2025-06-10", "2025-06-12", BookingStatus::Pending));
    let desk = loaded_desk(backend, "2025-06-01").await;

    let grid = desk.calendar();
    // June 2025 starts on a Sunday
    assert_eq!(grid.len(), 42);
    assert_eq!(grid[0].date, d("2025-05-26"));
    assert_eq!(grid[6].date, d("2025-06-01"));
    assert!(grid[0..6].iter().all(|c| !c.is_current_month));
    assert_eq!(grid.iter().filter(|c| c.is_current_month).count(), 30);
    assert!(grid[6].is_today);

    let occupied = |date: &str| grid.iter().find(|c| c.date == d(date)).unwrap().occupied_rooms;
    assert_eq!(occupied("2025-06-09"), 0);
    assert_eq!(occupied("2025-06-10"), 1);
    assert_eq!(occupied("2025-06-11"), 1);
    assert_eq!(occupied("2025-06-12"), 0);

    assert_eq!(desk.day_class(d("2025-06-10")), Some(DayClass::Partial));
    assert_eq!(desk.day_class(d("2025-06-12")), Some(DayClass::Neutral));
    assert_eq!(desk.day_class(d("2025-05-31")), Some(DayClass::Other));
    assert_eq!(desk.day_class(d("2025-08-01")), None);
}

#[tokio::test]
async fn test_full_day() {
    let backend = seeded_backend("2025-06-01");
    for room in 1..=3 {
        backend.add_booking(booking(room, room, "2025-06-10", "2025-06-11", BookingStatus::Pending));
    }
    // a second booking on the same room does not count twice
    backend.add_booking(booking(4, 1, "2025-06-10", "2025-06-11", BookingStatus::CheckedIn));
    // terminal statuses free the room
    backend.add_booking(booking(5, 2, "2025-06-11", "2025-06-12", BookingStatus::Canceled));
    let desk = loaded_desk(backend, "2025-06-01").await;

    assert_eq!(desk.day_class(d("2025-06-10")), Some(DayClass::Full));
    assert_eq!(desk.day_class(d("2025-06-11")), Some(DayClass::Neutral));
    assert_eq!(desk.day_detail(d("2025-06-10")).len(), 4);
}

#[tokio::test]
async fn test_reverse_drag_normalizes() {
    let desk = loaded_desk(seeded_backend("2025-06-15"), "2025-06-15").await;
    desk.set_month(YearMonth::new(2025, 8).unwrap());
    assert_eq!(desk.month_label(), "August 2025");

    assert!(desk.press(d("2025-08-03")));
    assert!(desk.hover(d("2025-08-02")));
    assert!(desk.hover(d("2025-08-01")));

    let range = DateRange::new(d("2025-08-01"), d("2025-08-03"));
    assert_eq!(desk.selecting(), Some(range));
    assert_eq!(desk.day_class(d("2025-08-02")), Some(DayClass::Selecting));

    assert_eq!(desk.release(), Some(SelectionOutcome::Close(range)));
    assert_eq!(desk.selecting(), None);
    assert_eq!(desk.day_class(d("2025-08-02")), Some(DayClass::Neutral));
}

#[tokio::test]
async fn test_click_shows_day_detail() {
    let backend = seeded_backend("2025-06-01");
    backend.add_booking(booking(1, 1, "2025-06-10", "2025-06-12", BookingStatus::Pending));
    backend.add_booking(booking(2, 2, "2025-06-11", "2025-06-13", BookingStatus::Complete));
    let desk = loaded_desk(backend, "2025-06-01").await;

    assert!(desk.press(d("2025-06-11")));
    assert_eq!(
        desk.release(),
        Some(SelectionOutcome::DayDetail(d("2025-06-11")))
    );
    let detail = desk.day_detail(d("2025-06-11"));
    assert_eq!(detail.iter().map(|b| b.id).collect::<Vec<_>>(), [BookingId(1)]);
}

#[tokio::test]
async fn test_padding_days_ignore_pointer() {
    let desk = loaded_desk(seeded_backend("2025-06-15"), "2025-06-15").await;
    assert!(!desk.press(d("2025-05-31")));
    assert_eq!(desk.release(), None);

    assert!(desk.press(d("2025-06-30")));
    assert!(!desk.hover(d("2025-07-01")));
    assert_eq!(
        desk.release(),
        Some(SelectionOutcome::DayDetail(d("2025-06-30")))
    );
}

#[tokio::test]
async fn test_watchers_see_transitions() {
    let backend = seeded_backend("2025-06-10");
    backend.add_booking(booking(1, 1, "2025-06-10", "2025-06-12", BookingStatus::Pending));
    let desk = loaded_desk(backend, "2025-06-10").await;

    let mut grid = desk.subscribe();
    grid.borrow_and_update();
    desk.cancel(BookingId(1)).await.unwrap();

    assert!(grid.has_changed().unwrap());
    let cell = grid
        .borrow_and_update()
        .iter()
        .find(|c| c.date == d("2025-06-10"))
        .cloned()
        .unwrap();
    assert_eq!(cell.occupied_rooms, 0);
}

#[tokio::test]
async fn test_boards_and_free_rooms() {
    let backend = seeded_backend("2025-06-12");
    backend.add_booking(booking(1, 1, "2025-06-10", "2025-06-12", BookingStatus::CheckedIn));
    backend.add_booking(booking(2, 2, "2025-06-12", "2025-06-15", BookingStatus::Pending));
    let desk = loaded_desk(backend, "2025-06-12").await;

    assert_eq!(desk.arrivals_today()[0].id, BookingId(2));
    assert_eq!(desk.departures_today()[0].id, BookingId(1));

    let free = desk.free_rooms(d("2025-06-12"), d("2025-06-14")).await.unwrap();
    let names: Vec<&str> = free.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["101", "103"]);
}

#[tokio::test]
async fn test_month_navigation() {
    let desk = loaded_desk(seeded_backend("2025-12-20"), "2025-12-20").await;
    desk.next_month();
    assert_eq!(desk.month_label(), "January 2026");
    assert!(desk.calendar().iter().all(|c| !c.is_today));

    desk.go_to_today();
    assert_eq!(desk.month_label(), "December 2025");
    assert!(desk.calendar().iter().any(|c| c.is_today));
}
