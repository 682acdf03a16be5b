//! Weekly business-hours tables.
//!
//! Two shapes of the same table exist:
//!
//! - [`BusinessHours`] is what callers hand in. It is keyed by the
//!   application's day numbering, `0` = Sunday through `6` = Saturday, and
//!   deserializes from the JSON shape callers already store
//!   (`{"0": null, "1": {"open": "08:30", "close": "17:00"}, ...}`).
//! - [`WeeklySchedule`] is what the resolver reads. It is keyed by
//!   `chrono::Weekday` and is always complete.
//!
//! [`crate::weekday::adapt_schedule`] converts the first into the second.

use std::collections::BTreeMap;

use chrono::{NaiveTime, Timelike, Weekday};
use serde::Deserialize;

use crate::error::{CallTimeError, Result};

// ── Operating days ──────────────────────────────────────────────────────────

/// Opening and closing wall-clock times for a day the business is open.
///
/// Always satisfies `open < close`; both are whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingDay {
    open: NaiveTime,
    close: NaiveTime,
}

impl OperatingDay {
    /// Build an operating day from two wall-clock times.
    ///
    /// # Errors
    ///
    /// Returns [`CallTimeError::InvalidTimeOfDay`] if either time carries
    /// seconds, or [`CallTimeError::InvalidSchedule`] unless `open < close`.
    pub fn new(open: NaiveTime, close: NaiveTime) -> Result<Self> {
        for time in [open, close] {
            if time != truncate_to_minute(time) {
                return Err(CallTimeError::InvalidTimeOfDay(format!(
                    "'{}' has sub-minute precision",
                    time
                )));
            }
        }
        if open >= close {
            return Err(CallTimeError::InvalidSchedule(format!(
                "opening time {} must be before closing time {}",
                open.format("%H:%M"),
                close.format("%H:%M")
            )));
        }
        Ok(Self { open, close })
    }

    /// Parse an operating day from `"HH:MM"` strings.
    pub fn parse(open: &str, close: &str) -> Result<Self> {
        Self::new(parse_time_of_day(open)?, parse_time_of_day(close)?)
    }

    pub fn open(&self) -> NaiveTime {
        self.open
    }

    pub fn close(&self) -> NaiveTime {
        self.close
    }
}

/// The hours of one weekday: open between two times, or closed all day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Option<RawDayHours>")]
pub enum DayHours {
    Operating(OperatingDay),
    Closed,
}

impl DayHours {
    /// Shorthand for `DayHours::Operating(OperatingDay::parse(open, close)?)`.
    pub fn operating(open: &str, close: &str) -> Result<Self> {
        OperatingDay::parse(open, close).map(DayHours::Operating)
    }

    pub fn is_operating(&self) -> bool {
        matches!(self, DayHours::Operating(_))
    }

    pub fn operating_day(&self) -> Option<OperatingDay> {
        match self {
            DayHours::Operating(day) => Some(*day),
            DayHours::Closed => None,
        }
    }
}

/// Wire shape of a day. `start`/`end` are the legacy key names.
#[derive(Deserialize)]
struct RawDayHours {
    #[serde(default, alias = "start")]
    open: Option<String>,
    #[serde(default, alias = "end")]
    close: Option<String>,
}

impl TryFrom<Option<RawDayHours>> for DayHours {
    type Error = CallTimeError;

    fn try_from(raw: Option<RawDayHours>) -> Result<Self> {
        match raw {
            None => Ok(DayHours::Closed),
            Some(RawDayHours {
                open: None,
                close: None,
            }) => Ok(DayHours::Closed),
            Some(RawDayHours {
                open: Some(open),
                close: Some(close),
            }) => DayHours::operating(&open, &close),
            Some(RawDayHours { open, close }) => Err(CallTimeError::InvalidSchedule(format!(
                "a day needs both open and close or neither (open: {:?}, close: {:?})",
                open, close
            ))),
        }
    }
}

// ── Caller-facing table ─────────────────────────────────────────────────────

/// Business hours keyed by application day number (`0` = Sunday … `6` = Saturday).
///
/// This type does not check completeness; adapting it into a
/// [`WeeklySchedule`] does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct BusinessHours {
    days: BTreeMap<u8, DayHours>,
}

impl BusinessHours {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hours for an application day number, replacing any previous entry.
    pub fn with_day(mut self, day: u8, hours: DayHours) -> Self {
        self.days.insert(day, hours);
        self
    }

    pub fn get(&self, day: u8) -> Option<DayHours> {
        self.days.get(&day).copied()
    }

    /// Application day numbers present in the table, ascending.
    pub fn day_numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.days.keys().copied()
    }
}

impl FromIterator<(u8, DayHours)> for BusinessHours {
    fn from_iter<I: IntoIterator<Item = (u8, DayHours)>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

// ── Resolver-facing table ───────────────────────────────────────────────────

/// A complete week of business hours keyed by `chrono::Weekday`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklySchedule {
    /// Indexed by `Weekday::num_days_from_monday`.
    days: [DayHours; 7],
}

impl WeeklySchedule {
    /// Build from seven entries in ISO order, Monday first.
    pub fn from_iso_days(days: [DayHours; 7]) -> Self {
        Self { days }
    }

    pub fn all_closed() -> Self {
        Self {
            days: [DayHours::Closed; 7],
        }
    }

    /// Set the hours for `weekday`, replacing any previous entry.
    pub fn with_day(mut self, weekday: Weekday, hours: DayHours) -> Self {
        self.days[weekday.num_days_from_monday() as usize] = hours;
        self
    }

    pub fn hours_on(&self, weekday: Weekday) -> DayHours {
        self.days[weekday.num_days_from_monday() as usize]
    }

    pub fn has_operating_day(&self) -> bool {
        self.days.iter().any(DayHours::is_operating)
    }
}

// ── Parsing helpers ─────────────────────────────────────────────────────────

/// Parse a wall-clock time of day: `"08:30"`, `"08:30:00"` or the legacy
/// `"08:30:000"`. A seconds field, when present, must be zero.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    let invalid = || CallTimeError::InvalidTimeOfDay(format!("'{}'", s));

    let parts: Vec<&str> = s.trim().split(':').collect();
    let (hour, minute) = match parts.as_slice() {
        [hour, minute] => (*hour, *minute),
        [hour, minute, seconds] => {
            if !is_digits(seconds, 3) {
                return Err(invalid());
            }
            if seconds.chars().any(|c| c != '0') {
                return Err(CallTimeError::InvalidTimeOfDay(format!(
                    "'{}' has sub-minute precision",
                    s
                )));
            }
            (*hour, *minute)
        }
        _ => return Err(invalid()),
    };

    if !is_digits(hour, 2) || !is_digits(minute, 2) {
        return Err(invalid());
    }
    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

fn is_digits(s: &str, max_len: usize) -> bool {
    !s.is_empty() && s.len() <= max_len && s.chars().all(|c| c.is_ascii_digit())
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}
