//! Front-desk command line
//!
//! Runs one desk operation against a JSON snapshot of the hotel backend and
//! writes the snapshot back when the operation changed it.

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use sbb_core::{
    classify, BookingFilter, CalendarDay, DayClass, DeskConfig, Gateways, HotelDesk,
    InMemoryBackend, LoggingConfig, RoomFilter, Snapshot,
};
use sbb_model::{BookingId, DateRange, Transition, YearMonth};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn cli() -> Command {
    Command::new("sbb-desk")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Hotel front desk: occupancy calendar, booking lifecycle, closures")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("data")
                .long("data")
                .short('d')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("JSON snapshot of bookings, rooms, closures and guests"),
        )
        .subcommand(
            Command::new("calendar")
                .about("Print the availability calendar of a month")
                .arg(
                    Arg::new("month")
                        .long("month")
                        .value_parser(value_parser!(YearMonth))
                        .help("Month as YYYY-MM (default: the current month)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("boards")
                .about("Print today's arrivals, departures and status counts")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("transition")
                .about("Move a booking through its lifecycle")
                .arg(
                    Arg::new("booking")
                        .long("booking")
                        .required(true)
                        .value_parser(value_parser!(u32))
                        .help("Booking id"),
                )
                .arg(
                    Arg::new("action")
                        .long("action")
                        .required(true)
                        .value_parser(value_parser!(Transition))
                        .help("accept, cancel, checkout or complete"),
                ),
        )
        .subcommand(
            Command::new("close")
                .about("Close the hotel over an inclusive date range")
                .arg(date_arg("from", true))
                .arg(date_arg("to", true))
                .arg(
                    Arg::new("reason")
                        .long("reason")
                        .default_value("")
                        .help("Shown on closed days"),
                ),
        )
        .subcommand(
            Command::new("reopen")
                .about("Reopen an inclusive date range, carving existing closures")
                .arg(date_arg("from", true))
                .arg(date_arg("to", false)),
        )
        .subcommand(
            Command::new("free-rooms")
                .about("List rooms free over a stay")
                .arg(date_arg("check-in", true))
                .arg(date_arg("check-out", true)),
        )
        .subcommand(
            Command::new("guests")
                .about("Search the guest register")
                .arg(
                    Arg::new("query")
                        .long("query")
                        .short('q')
                        .default_value("")
                        .help("Substring of first or last name"),
                ),
        )
}

fn date_arg(name: &'static str, required: bool) -> Arg {
    Arg::new(name)
        .long(name)
        .required(required)
        .value_parser(value_parser!(NaiveDate))
        .help("Date as YYYY-MM-DD")
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter.as_str()));

    if logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no snapshot yet, starting empty");
        return Ok(Snapshot::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&content)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;

    if let Some(b) = snapshot.bookings.iter().find(|b| b.check_out <= b.check_in) {
        bail!(
            "snapshot {}: booking {} checks out on {}, not after check-in {}",
            path.display(),
            b.id,
            b.check_out,
            b.check_in
        );
    }
    if let Some(c) = snapshot.closures.iter().find(|c| c.end_date < c.start_date) {
        bail!(
            "snapshot {}: closure {} ends on {}, before it starts on {}",
            path.display(),
            c.id,
            c.end_date,
            c.start_date
        );
    }
    Ok(snapshot)
}

fn save_snapshot(path: &Path, snapshot: &Snapshot) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, content).with_context(|| format!("writing snapshot {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => DeskConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DeskConfig::default(),
    };
    init_tracing(&config.logging);
    let today = config.today();
    let config = config.with_today(today);
    tracing::debug!(hotel = %config.hotel_id, %today, "starting sbb-desk");

    let data = matches.get_one::<PathBuf>("data").cloned();
    let snapshot = match &data {
        Some(path) => load_snapshot(path)?,
        None => Snapshot::default(),
    };
    let backend = Arc::new(
        InMemoryBackend::from_snapshot(snapshot, today).with_rules(config.backend),
    );
    let desk = HotelDesk::new(config, Gateways::shared(backend.clone()));
    desk.load().await.context("loading desk state")?;

    let changed = run(&desk, &matches).await?;

    if changed {
        match &data {
            Some(path) => save_snapshot(path, &backend.snapshot())?,
            None => tracing::warn!("no --data file given, changes are discarded"),
        }
    }
    Ok(())
}

/// Runs the selected subcommand. Returns whether the backend changed.
async fn run(desk: &HotelDesk, matches: &ArgMatches) -> anyhow::Result<bool> {
    match matches.subcommand() {
        Some(("calendar", args)) => {
            if let Some(month) = args.get_one::<YearMonth>("month") {
                desk.set_month(*month);
            }
            let grid = desk.calendar();
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&*grid)?);
            } else {
                print_calendar(&desk.month_label(), &grid);
            }
            Ok(false)
        }
        Some(("boards", args)) => {
            let arrivals = desk.arrivals_today();
            let departures = desk.departures_today();
            let bookings = desk.booking_counts();
            let rooms = desk.room_counts();
            if args.get_flag("json") {
                let report = serde_json::json!({
                    "today": desk.today(),
                    "arrivals": arrivals,
                    "departures": departures,
                    "bookings": bookings
                        .iter()
                        .map(|(s, n)| (s.as_str(), n))
                        .collect::<std::collections::BTreeMap<_, _>>(),
                    "rooms": rooms
                        .iter()
                        .map(|(s, n)| (s.as_str(), n))
                        .collect::<std::collections::BTreeMap<_, _>>(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Today: {}", desk.today());
                println!("Arrivals: {}", arrivals.len());
                for b in &arrivals {
                    println!("  #{} room {} until {} [{}]", b.id, b.room_id, b.check_out, b.status);
                }
                println!("Departures: {}", departures.len());
                for b in &departures {
                    println!("  #{} room {} since {} [{}]", b.id, b.room_id, b.check_in, b.status);
                }
                println!("Bookings:");
                for (status, count) in &bookings {
                    println!("  {:<12} {count}", status.as_str());
                }
                println!("Rooms:");
                for (status, count) in &rooms {
                    println!("  {:<12} {count}", status.as_str());
                }
                let to_clean = desk.rooms(RoomFilter::Status(sbb_model::RoomStatus::ToClean));
                if !to_clean.is_empty() {
                    let names: Vec<&str> = to_clean.iter().map(|r| r.name.as_str()).collect();
                    println!("To clean: {}", names.join(", "));
                }
            }
            Ok(false)
        }
        Some(("transition", args)) => {
            let id = BookingId(*args.get_one::<u32>("booking").context("missing --booking")?);
            let action = *args
                .get_one::<Transition>("action")
                .context("missing --action")?;
            match desk.apply(id, action).await {
                Ok(committed) => {
                    println!("Booking {} is now {}", committed.booking, committed.status);
                    if let Some(status) = committed.room_status {
                        println!("Room {} is now {}", committed.room, status);
                    }
                    Ok(true)
                }
                Err(e) => bail!("{}", e.user_message()),
            }
        }
        Some(("close", args)) => {
            let range = range_arg(args, "from", "to")?;
            let reason = args.get_one::<String>("reason").cloned().unwrap_or_default();
            match desk.close_range(range, reason).await {
                Ok(closure) => {
                    println!("Closed {} (closure {})", closure.range(), closure.id);
                    Ok(true)
                }
                Err(e) => bail!("{}", e.user_message()),
            }
        }
        Some(("reopen", args)) => {
            let from = *args.get_one::<NaiveDate>("from").context("missing --from")?;
            let to = args.get_one::<NaiveDate>("to").copied().unwrap_or(from);
            let range = DateRange::new(from, to);
            if let Err(e) = desk.reopen_range(range).await {
                bail!("{}", e.user_message());
            }
            println!("Reopened {range}");
            for closure in desk.closures() {
                println!("  still closed {} {}", closure.range(), closure.reason);
            }
            Ok(true)
        }
        Some(("free-rooms", args)) => {
            let check_in = *args.get_one::<NaiveDate>("check-in").context("missing --check-in")?;
            let check_out = *args
                .get_one::<NaiveDate>("check-out")
                .context("missing --check-out")?;
            let rooms = desk
                .free_rooms(check_in, check_out)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            for room in &rooms {
                println!("{:>6}  {:>8}  {}", room.name, room.base_price, room.description);
            }
            Ok(false)
        }
        Some(("guests", args)) => {
            let query = args.get_one::<String>("query").map_or("", String::as_str);
            let found = desk.guests().filter(query);
            if desk.guests().is_unknown(query) {
                println!("No guest matches \"{}\"", query.trim());
            }
            for guest in &found {
                println!("{:>5}  {}", guest.id, guest.display_name());
            }
            Ok(false)
        }
        _ => {
            // The full booking list is the default view
            for b in desk.bookings(BookingFilter::All) {
                println!(
                    "#{:<5} room {:<4} {}..{} {}",
                    b.id, b.room_id, b.check_in, b.check_out, b.status
                );
            }
            Ok(false)
        }
    }
}

fn range_arg(args: &ArgMatches, from: &str, to: &str) -> anyhow::Result<DateRange> {
    let from = *args
        .get_one::<NaiveDate>(from)
        .with_context(|| format!("missing --{from}"))?;
    let to = *args
        .get_one::<NaiveDate>(to)
        .with_context(|| format!("missing --{to}"))?;
    Ok(DateRange::new(from, to))
}

fn print_calendar(label: &str, grid: &[CalendarDay]) {
    println!("{label:^34}");
    println!(" Mo   Tu   We   Th   Fr   Sa   Su");
    for week in grid.chunks(7) {
        let line: Vec<String> = week.iter().map(cell).collect();
        println!("{}", line.join(" "));
    }
    println!("x closed  # full  + partial  . free");
}

fn cell(day: &CalendarDay) -> String {
    let mark = match classify(day, None) {
        DayClass::Other => return "    ".to_string(),
        DayClass::Closed => 'x',
        DayClass::Full => '#',
        DayClass::Partial => '+',
        DayClass::Selecting | DayClass::Neutral => '.',
    };
    let today = if day.is_today { '*' } else { ' ' };
    format!("{:>2}{mark}{today}", day.day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn parses_transition() {
        let matches = cli()
            .try_get_matches_from(["sbb-desk", "transition", "--booking", "3", "--action", "checkin"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(args.get_one::<Transition>("action"), Some(&Transition::Accept));
    }

    #[test]
    fn rejects_bad_month() {
        assert!(cli()
            .try_get_matches_from(["sbb-desk", "calendar", "--month", "2025-13"])
            .is_err());
    }

    #[test]
    fn missing_snapshot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = load_snapshot(&dir.path().join("absent.json")).unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn snapshot_round_trips_through_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"rooms":[{{"id":1,"hotelId":1,"name":"101","basePrice":90,"status":"TO_CLEAN"}}]}}"#
        )
        .unwrap();
        let snapshot = load_snapshot(file.path()).unwrap();
        assert_eq!(snapshot.rooms[0].status(), sbb_model::RoomStatus::ToClean);

        save_snapshot(file.path(), &snapshot).unwrap();
        assert_eq!(load_snapshot(file.path()).unwrap(), snapshot);
    }

    #[test]
    fn unordered_stay_in_snapshot_is_refused() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"bookings":[{{"id":4,"guestId":1,"roomId":1,"checkIn":"2025-06-12","checkOut":"2025-06-12","price":90}}]}}"#
        )
        .unwrap();
        let err = load_snapshot(file.path()).unwrap_err();
        assert!(err.to_string().contains("booking 4"), "{err}");
    }

    #[test]
    fn inverted_closure_in_snapshot_is_refused() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"closures":[{{"id":2,"hotelId":1,"startDate":"2025-07-05","endDate":"2025-07-01","reason":""}}]}}"#
        )
        .unwrap();
        let err = load_snapshot(file.path()).unwrap_err();
        assert!(err.to_string().contains("closure 2"), "{err}");
    }

    #[test]
    fn cell_marks() {
        let day = CalendarDay {
            date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            day: 10,
            is_current_month: true,
            is_today: true,
            occupied_rooms: 1,
            total_rooms: 3,
            closure: None,
        };
        assert_eq!(cell(&day), "10+*");
    }
}
