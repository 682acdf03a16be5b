//! Weekday numbering adapter.
//!
//! Callers number weekdays `0..=6` starting from Sunday. `chrono` numbers them
//! ISO-style, `1..=7` starting from Monday (`Weekday::number_from_monday`), so
//! Sunday moves from `0` to `7` and every other day keeps its number. The
//! lookup tables below are the only place the two conventions meet.

use chrono::Weekday;
use tracing::trace;

use crate::error::{CallTimeError, Result};
use crate::schedule::{BusinessHours, WeeklySchedule};

/// `(application day, ISO day)` pairs.
const DAY_NUMBERS: [(u8, u8); 7] = [(0, 7), (1, 1), (2, 2), (3, 3), (4, 4), (5, 5), (6, 6)];

/// ISO day numbers and the `chrono` weekday each one names.
const ISO_WEEKDAYS: [(u8, Weekday); 7] = [
    (1, Weekday::Mon),
    (2, Weekday::Tue),
    (3, Weekday::Wed),
    (4, Weekday::Thu),
    (5, Weekday::Fri),
    (6, Weekday::Sat),
    (7, Weekday::Sun),
];

/// Map an application day number (0 = Sunday) to its ISO number (7 = Sunday).
pub fn app_to_iso(day: u8) -> Option<u8> {
    DAY_NUMBERS
        .iter()
        .find(|(app, _)| *app == day)
        .map(|(_, iso)| *iso)
}

/// Map an ISO day number (7 = Sunday) back to the application number (0 = Sunday).
pub fn iso_to_app(iso: u8) -> Option<u8> {
    DAY_NUMBERS
        .iter()
        .find(|(_, i)| *i == iso)
        .map(|(app, _)| *app)
}

pub fn weekday_for_iso(iso: u8) -> Option<Weekday> {
    ISO_WEEKDAYS
        .iter()
        .find(|(i, _)| *i == iso)
        .map(|(_, weekday)| *weekday)
}

/// Adapt a caller's business-hours table into a [`WeeklySchedule`].
///
/// # Errors
///
/// Returns [`CallTimeError::InvalidSchedule`] if the table uses a day number
/// outside `0..=6` or omits one of them.
pub fn adapt_schedule(hours: &BusinessHours) -> Result<WeeklySchedule> {
    if let Some(unknown) = hours.day_numbers().find(|day| app_to_iso(*day).is_none()) {
        return Err(CallTimeError::InvalidSchedule(format!(
            "day {} is outside 0 (Sunday) ..= 6 (Saturday)",
            unknown
        )));
    }

    let mut schedule = WeeklySchedule::all_closed();
    for (app, iso) in DAY_NUMBERS {
        let day_hours = hours.get(app).ok_or_else(|| {
            CallTimeError::InvalidSchedule(format!("missing hours for day {}", app))
        })?;
        let weekday = weekday_for_iso(iso).ok_or_else(|| {
            CallTimeError::InvalidSchedule(format!("no weekday for ISO day {}", iso))
        })?;
        schedule = schedule.with_day(weekday, day_hours);
        trace!(app_day = app, iso_day = iso, %weekday, ?day_hours, "adapted weekday");
    }

    Ok(schedule)
}

impl TryFrom<&BusinessHours> for WeeklySchedule {
    type Error = CallTimeError;

    fn try_from(hours: &BusinessHours) -> Result<Self> {
        adapt_schedule(hours)
    }
}
