//! Business-hours intervals for a calendar date.
//!
//! Instants are compared against a day's interval at minute resolution: the
//! instant is truncated to its minute first, so its seconds never carry it
//! across a boundary. `17:00:45` sits exactly at a 17:00 close, `08:30:10` is
//! open.

use chrono::{DateTime, Datelike, NaiveDate, Timelike};
use chrono_tz::Tz;

use crate::clock::local_instant;
use crate::error::{CallTimeError, Result};
use crate::schedule::{DayHours, OperatingDay, WeeklySchedule};

/// Concrete opening hours of one date, `[start, end)` in absolute time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatingInterval {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl OperatingInterval {
    fn realize(date: NaiveDate, day: OperatingDay, tz: &Tz) -> Self {
        Self {
            start: local_instant(tz, date, day.open()),
            end: local_instant(tz, date, day.close()),
        }
    }

    /// Half-open containment; the closing instant itself is outside.
    pub fn contains(&self, instant: &DateTime<Tz>) -> bool {
        self.start <= *instant && *instant < self.end
    }
}

/// Where an instant sits within its local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DayPosition {
    Closed,
    BeforeOpen,
    Open,
    AtClose,
    AfterClose,
}

/// The schedule entry for `date`'s weekday.
pub fn hours_for(date: NaiveDate, schedule: &WeeklySchedule) -> DayHours {
    schedule.hours_on(date.weekday())
}

/// Build the opening interval of `date` in `tz`.
///
/// # Errors
///
/// Returns [`CallTimeError::NotOperating`] if `date` is a closed day. Callers
/// must check [`DayHours::is_operating`] first.
pub fn interval_for(
    date: NaiveDate,
    schedule: &WeeklySchedule,
    tz: &Tz,
) -> Result<OperatingInterval> {
    let day = hours_for(date, schedule).operating_day().ok_or_else(|| {
        CallTimeError::NotOperating(format!("{} is a closed {}", date, date.weekday()))
    })?;
    Ok(OperatingInterval::realize(date, day, tz))
}

/// Whether `instant` falls within its date's business hours.
///
/// Inclusive of the closing boundary, so that stepping from half an hour
/// before close by half an hour lands on close rather than being rejected.
pub fn is_within_operating_hours(instant: &DateTime<Tz>, schedule: &WeeklySchedule) -> bool {
    matches!(
        position_in_day(instant, schedule),
        DayPosition::Open | DayPosition::AtClose
    )
}

pub(crate) fn position_in_day(instant: &DateTime<Tz>, schedule: &WeeklySchedule) -> DayPosition {
    let date = instant.date_naive();
    let interval = match hours_for(date, schedule) {
        DayHours::Operating(day) => OperatingInterval::realize(date, day, &instant.timezone()),
        DayHours::Closed => return DayPosition::Closed,
    };

    let minute = truncate_to_minute(instant);
    if minute < interval.start {
        DayPosition::BeforeOpen
    } else if interval.contains(&minute) {
        DayPosition::Open
    } else if minute == interval.end {
        DayPosition::AtClose
    } else {
        DayPosition::AfterClose
    }
}

fn truncate_to_minute(instant: &DateTime<Tz>) -> DateTime<Tz> {
    instant
        .with_second(0)
        .and_then(|dt| dt.with_nanosecond(0))
        .unwrap_or(*instant)
}
