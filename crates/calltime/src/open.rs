//! Next-open-instant resolution.
//!
//! Finds the earliest instant at or after a given one that lies inside
//! business hours and outside every blackout interval. Each pass:
//!
//! 1. picks a target date and time of day from where the instant sits in its
//!    local day (before opening → that day's opening; at or after closing →
//!    the next day's opening; open → the instant itself);
//! 2. walks forward over closed days to the first operating day;
//! 3. combines date and time into a candidate;
//! 4. if the candidate is blacked out, starts the next pass from the end of
//!    that blackout.
//!
//! The search is bounded. A schedule with no operating day, or a chain of
//! blackouts that never lets up, yields
//! [`CallTimeError::ScheduleUnsatisfiable`] instead of looping forever.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use tracing::{debug, trace};

use crate::blackout::BlackoutCalendar;
use crate::error::{CallTimeError, Result};
use crate::hours::{
    hours_for, interval_for, is_within_operating_hours, position_in_day, DayPosition,
};
use crate::schedule::WeeklySchedule;

/// Maximum consecutive blackout intervals skipped in one resolution.
pub const MAX_BLACKOUT_HOPS: usize = 1_000;

/// How far past the starting date a resolution may look for an opening.
pub const SEARCH_HORIZON_DAYS: i64 = 5 * 366;

/// Closed days that may be skipped in a row before the week is known to be empty.
const DAYS_PER_WEEK: u32 = 7;

/// Whether `instant` is inside business hours (closing inclusive) and outside
/// every blackout.
pub fn is_open_instant(
    instant: &DateTime<Tz>,
    schedule: &WeeklySchedule,
    calendar: &BlackoutCalendar,
) -> bool {
    is_within_operating_hours(instant, schedule) && !calendar.contains(instant)
}

/// Resolve the earliest instant `>= instant` that is open and not blacked out.
///
/// An instant already inside business hours (and outside blackouts) is
/// returned unchanged. An instant exactly at closing time moves to the next
/// opening.
///
/// # Errors
///
/// Returns [`CallTimeError::ScheduleUnsatisfiable`] when the schedule has no
/// operating day, when more than [`MAX_BLACKOUT_HOPS`] blackouts chain
/// together, or when the opening lies beyond [`SEARCH_HORIZON_DAYS`].
pub fn next_open_instant(
    instant: &DateTime<Tz>,
    schedule: &WeeklySchedule,
    calendar: &BlackoutCalendar,
) -> Result<DateTime<Tz>> {
    let origin = instant.date_naive();
    let mut cursor = *instant;

    for hop in 0..=MAX_BLACKOUT_HOPS {
        let candidate = open_candidate(&cursor, schedule)?;

        if (candidate.date_naive() - origin).num_days() > SEARCH_HORIZON_DAYS {
            return Err(CallTimeError::ScheduleUnsatisfiable(format!(
                "no opening within {} days of {}",
                SEARCH_HORIZON_DAYS, instant
            )));
        }

        match calendar.find(&candidate) {
            Some(blackout) => {
                trace!(
                    %candidate,
                    blackout = blackout.name.unwrap_or("unnamed"),
                    blackout_end = %blackout.end,
                    "candidate blacked out"
                );
                cursor = blackout.end;
            }
            None => {
                if hop > 0 {
                    debug!(%instant, resolved = %candidate, hops = hop, "skipped blackouts");
                }
                return Ok(candidate);
            }
        }
    }

    Err(CallTimeError::ScheduleUnsatisfiable(format!(
        "more than {} consecutive blackout intervals after {}",
        MAX_BLACKOUT_HOPS, instant
    )))
}

/// Steps 1-3: the nearest in-hours instant for `cursor`, ignoring blackouts.
fn open_candidate(cursor: &DateTime<Tz>, schedule: &WeeklySchedule) -> Result<DateTime<Tz>> {
    let mut date = match position_in_day(cursor, schedule) {
        DayPosition::Open => return Ok(*cursor),
        DayPosition::Closed | DayPosition::BeforeOpen => cursor.date_naive(),
        DayPosition::AtClose | DayPosition::AfterClose => next_day(cursor.date_naive())?,
    };

    let mut skipped = 0;
    while !hours_for(date, schedule).is_operating() {
        if skipped == DAYS_PER_WEEK {
            return Err(CallTimeError::ScheduleUnsatisfiable(
                "weekly schedule has no operating day".to_string(),
            ));
        }
        date = next_day(date)?;
        skipped += 1;
    }

    if skipped > 0 {
        trace!(%date, skipped, "skipped closed days");
    }
    Ok(interval_for(date, schedule, &cursor.timezone())?.start)
}

fn next_day(date: NaiveDate) -> Result<NaiveDate> {
    date.succ_opt()
        .ok_or_else(|| CallTimeError::InvalidDatetime(format!("no date after {}", date)))
}
