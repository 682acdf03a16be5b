//! Property tests for resolution invariants over the holiday calendar.

mod common;

use calltime::{
    advance_window_end, compute_window, is_open_instant, is_within_operating_hours,
    next_open_instant, QUANTUM_MINUTES,
};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::America::New_York;
use chrono_tz::Tz;
use proptest::prelude::*;

/// 2021-01-01T00:00:00Z
const RANGE_START: i64 = 1_609_459_200;
/// Four years of seconds, covering every fixture holiday.
const RANGE_SECONDS: i64 = 4 * 365 * 24 * 3600;

fn instant(offset_seconds: i64) -> DateTime<Tz> {
    Utc.timestamp_opt(RANGE_START + offset_seconds, 0)
        .single()
        .unwrap()
        .with_timezone(&New_York)
}

proptest! {
    #[test]
    fn next_open_is_idempotent(offset in 0..RANGE_SECONDS) {
        let schedule = common::standard_schedule();
        let calendar = common::holidays();
        let once = next_open_instant(&instant(offset), &schedule, &calendar).unwrap();
        let twice = next_open_instant(&once, &schedule, &calendar).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn next_open_never_moves_backwards(offset in 0..RANGE_SECONDS) {
        let origin = instant(offset);
        let resolved =
            next_open_instant(&origin, &common::standard_schedule(), &common::holidays()).unwrap();
        prop_assert!(resolved >= origin);
    }

    #[test]
    fn next_open_is_open(offset in 0..RANGE_SECONDS) {
        let schedule = common::standard_schedule();
        let calendar = common::holidays();
        let resolved = next_open_instant(&instant(offset), &schedule, &calendar).unwrap();
        prop_assert!(is_within_operating_hours(&resolved, &schedule));
        prop_assert!(!calendar.contains(&resolved));
    }

    #[test]
    fn advance_moves_forward_into_open_time(offset in 0..RANGE_SECONDS) {
        let schedule = common::standard_schedule();
        let calendar = common::holidays();
        let end = next_open_instant(&instant(offset), &schedule, &calendar).unwrap();
        let advanced = advance_window_end(&end, &schedule, &calendar).unwrap();
        prop_assert!(advanced > end);
        prop_assert!(is_open_instant(&advanced, &schedule, &calendar));
    }

    #[test]
    fn window_bounds_are_open(offset in 0..RANGE_SECONDS, quanta in 1i64..=16) {
        let schedule = common::standard_schedule();
        let calendar = common::holidays();
        let window = compute_window(
            &instant(offset),
            quanta * QUANTUM_MINUTES,
            &schedule,
            &calendar,
        )
        .unwrap();

        prop_assert!(window.start <= window.end);
        for bound in [window.start, window.end] {
            let local = bound.with_timezone(&New_York);
            prop_assert!(is_open_instant(&local, &schedule, &calendar), "{}", local);
        }
    }

    #[test]
    fn window_spans_at_least_its_duration(offset in 0..RANGE_SECONDS, quanta in 1i64..=16) {
        let window = compute_window(
            &instant(offset),
            quanta * QUANTUM_MINUTES,
            &common::standard_schedule(),
            &common::holidays(),
        )
        .unwrap();
        // Every step lands at or after `end + quantum`; skipped closed time only adds.
        prop_assert!((window.end - window.start).num_minutes() >= quanta * QUANTUM_MINUTES);
    }
}
