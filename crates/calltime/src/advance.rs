//! One quantum of window growth.
//!
//! A window's end moves forward 30 minutes at a time. When a step runs past
//! the day's closing time (or into a blackout), the part of the step that
//! overran is carried to the next opening instead of being lost. The carry is
//! at most one quantum.
//!
//! The carried instant is checked again: if the next open stretch is shorter
//! than the carry, or a blackout begins inside it, the remaining carry moves on
//! to the following opening by the same rule. The carry shrinks by at least a
//! minute on every pass, which bounds the loop.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use tracing::{debug, trace};

use crate::blackout::BlackoutCalendar;
use crate::error::{CallTimeError, Result};
use crate::hours::{hours_for, interval_for};
use crate::open::{is_open_instant, next_open_instant};
use crate::schedule::WeeklySchedule;

/// Window growth increment, in minutes.
pub const QUANTUM_MINUTES: i64 = 30;

/// One pass for the step itself plus one per minute the carry can shrink.
const MAX_CARRY_PASSES: i64 = QUANTUM_MINUTES + 1;

pub fn quantum() -> Duration {
    Duration::minutes(QUANTUM_MINUTES)
}

/// Advance a window end by one quantum.
///
/// `current_end` must already be open (see [`is_open_instant`]). The result is
/// strictly later than `current_end` and is itself open.
///
/// # Errors
///
/// Propagates [`CallTimeError::ScheduleUnsatisfiable`] from
/// [`next_open_instant`].
pub fn advance_window_end(
    current_end: &DateTime<Tz>,
    schedule: &WeeklySchedule,
    calendar: &BlackoutCalendar,
) -> Result<DateTime<Tz>> {
    let mut cursor = *current_end;
    let mut carry = quantum();

    for _ in 0..MAX_CARRY_PASSES {
        let candidate = cursor + carry;
        if is_open_instant(&candidate, schedule, calendar) {
            return Ok(candidate);
        }

        let spilled = spillover(&cursor, &candidate, schedule, calendar)?;
        let reopened = next_open_instant(&candidate, schedule, calendar)?;
        debug!(
            %cursor,
            %candidate,
            %reopened,
            spillover_minutes = spilled.num_minutes(),
            "step left open hours"
        );

        if spilled == Duration::zero() {
            return Ok(reopened);
        }
        cursor = reopened;
        carry = spilled;
    }

    Err(CallTimeError::ScheduleUnsatisfiable(format!(
        "carry from {} never settled into open hours",
        current_end
    )))
}

/// How much of the step `from → candidate` fell past the point where `from`'s
/// open stretch ended, in whole minutes, clamped to `[0, quantum]`.
///
/// The stretch ends at `from`'s closing time or at the first blackout starting
/// after `from`, whichever is earlier.
fn spillover(
    from: &DateTime<Tz>,
    candidate: &DateTime<Tz>,
    schedule: &WeeklySchedule,
    calendar: &BlackoutCalendar,
) -> Result<Duration> {
    let date = from.date_naive();
    let mut boundary = *candidate;

    if hours_for(date, schedule).is_operating() {
        boundary = boundary.min(interval_for(date, schedule, &from.timezone())?.end);
    }
    if let Some(blackout_start) = calendar.first_start_within(from, candidate) {
        trace!(%blackout_start, "step ran into blackout");
        boundary = boundary.min(blackout_start);
    }

    let overrun = Duration::minutes((*candidate - boundary).num_minutes());
    Ok(overrun.clamp(Duration::zero(), quantum()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blackout::BlackoutInterval;
    use crate::clock::parse_instant;
    use crate::schedule::DayHours;
    use chrono_tz::America::Chicago;

    fn weekdays() -> WeeklySchedule {
        let open = DayHours::operating("08:30", "17:00").unwrap();
        WeeklySchedule::from_iso_days([
            open,
            open,
            open,
            open,
            open,
            DayHours::Closed,
            DayHours::Closed,
        ])
    }

    fn at(s: &str) -> DateTime<Tz> {
        parse_instant(s, &Chicago).unwrap()
    }

    fn step(s: &str, schedule: &WeeklySchedule, calendar: &BlackoutCalendar) -> String {
        advance_window_end(&at(s), schedule, calendar)
            .unwrap()
            .naive_local()
            .to_string()
    }

    #[test]
    fn step_inside_hours_adds_quantum() {
        let empty = BlackoutCalendar::empty();
        assert_eq!(step("2024-10-09T10:00:00", &weekdays(), &empty), "2024-10-09 10:30:00");
    }

    #[test]
    fn step_may_land_exactly_on_close() {
        let empty = BlackoutCalendar::empty();
        assert_eq!(step("2024-10-09T16:30:00", &weekdays(), &empty), "2024-10-09 17:00:00");
    }

    #[test]
    fn step_from_close_carries_full_quantum() {
        let empty = BlackoutCalendar::empty();
        assert_eq!(step("2024-10-09T17:00:00", &weekdays(), &empty), "2024-10-10 09:00:00");
    }

    #[test]
    fn partial_overrun_carries_whole_minutes() {
        let empty = BlackoutCalendar::empty();
        // 16:41:15 + 30m = 17:11:15, 11 whole minutes past close.
        assert_eq!(step("2024-10-09T16:41:15", &weekdays(), &empty), "2024-10-10 08:41:00");
    }

    #[test]
    fn friday_overrun_carries_to_monday() {
        let empty = BlackoutCalendar::empty();
        assert_eq!(step("2024-10-11T16:45:00", &weekdays(), &empty), "2024-10-14 08:45:00");
    }

    #[test]
    fn step_into_blackout_carries_only_the_blacked_out_part() {
        let calendar = BlackoutCalendar::new(vec![BlackoutInterval::parse(
            "2024-12-03T11:45:00",
            "2024-12-03T13:00:00",
        )
        .unwrap()]);
        assert_eq!(step("2024-12-03T11:30:00", &weekdays(), &calendar), "2024-12-03 13:15:00");
    }

    #[test]
    fn step_ending_at_blackout_start_carries_nothing() {
        let calendar = BlackoutCalendar::new(vec![BlackoutInterval::parse(
            "2024-12-03T12:00:00",
            "2024-12-03T13:00:00",
        )
        .unwrap()]);
        assert_eq!(step("2024-12-03T11:30:00", &weekdays(), &calendar), "2024-12-03 13:00:00");
    }

    #[test]
    fn carry_is_revalidated_against_short_opening() {
        // Thursday is open for only ten minutes.
        let open = DayHours::operating("08:30", "17:00").unwrap();
        let short = DayHours::operating("08:30", "08:40").unwrap();
        let schedule = WeeklySchedule::from_iso_days([
            open,
            open,
            open,
            short,
            open,
            DayHours::Closed,
            DayHours::Closed,
        ]);
        let empty = BlackoutCalendar::empty();
        // Wednesday 17:00 + 30m carries 30m; Thursday absorbs 10m, Friday the remaining 20m.
        assert_eq!(step("2024-10-09T17:00:00", &schedule, &empty), "2024-10-11 08:50:00");
    }

    #[test]
    fn carry_is_revalidated_against_blackout() {
        let calendar = BlackoutCalendar::new(vec![BlackoutInterval::parse(
            "2024-10-10T08:40:00",
            "2024-10-10T09:10:00",
        )
        .unwrap()]);
        // 30m carry: 08:30-08:40 before the blackout, the remaining 20m after 09:10.
        assert_eq!(step("2024-10-09T17:00:00", &weekdays(), &calendar), "2024-10-10 09:30:00");
    }

    #[test]
    fn seconds_past_close_stay_at_close() {
        let empty = BlackoutCalendar::empty();
        // 17:00:45 is still the closing minute; the next step carries a full quantum.
        assert_eq!(step("2024-10-09T16:30:45", &weekdays(), &empty), "2024-10-09 17:00:45");
        assert_eq!(step("2024-10-09T17:00:45", &weekdays(), &empty), "2024-10-10 09:00:00");
    }

    #[test]
    fn spillover_is_clamped_to_quantum() {
        let from = at("2024-10-09T17:00:00");
        let candidate = at("2024-10-09T18:10:00");
        let spilled =
            spillover(&from, &candidate, &weekdays(), &BlackoutCalendar::empty()).unwrap();
        assert_eq!(spilled, quantum());
    }
}
