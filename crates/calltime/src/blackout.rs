//! Blackout calendar: holidays and closures that override business hours.
//!
//! Intervals are stored as local wall-clock ranges and realized against the
//! zone of whichever instant is being checked, so one calendar serves every
//! branch regardless of its time zone. A calendar is an immutable value; to
//! change it, build a new one and swap it in between computations.

use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::clock::{parse_wall_clock, resolve_local};
use crate::error::{CallTimeError, Result};

/// A half-open wall-clock range `[start, end)` during which nothing may be
/// scheduled, optionally labelled (`"Christmas"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawBlackout")]
pub struct BlackoutInterval {
    start: NaiveDateTime,
    end: NaiveDateTime,
    name: Option<String>,
}

impl BlackoutInterval {
    /// # Errors
    ///
    /// Returns [`CallTimeError::InvalidBlackout`] unless `start < end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start >= end {
            return Err(CallTimeError::InvalidBlackout(format!(
                "start {} must be before end {}",
                start, end
            )));
        }
        Ok(Self {
            start,
            end,
            name: None,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parse from wall-clock strings such as `"2024-12-25T00:00:00"`.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_wall_clock(start)?, parse_wall_clock(end)?)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Project this interval onto absolute time in `tz`.
    pub fn realize(&self, tz: &Tz) -> RealizedBlackout<'_> {
        RealizedBlackout {
            start: resolve_local(tz, self.start),
            end: resolve_local(tz, self.end),
            name: self.name(),
        }
    }
}

/// Wire shape; `startDate`/`endDate` are the legacy key names.
#[derive(Deserialize)]
struct RawBlackout {
    #[serde(alias = "startDate")]
    start: String,
    #[serde(alias = "endDate")]
    end: String,
    #[serde(default)]
    name: Option<String>,
}

impl TryFrom<RawBlackout> for BlackoutInterval {
    type Error = CallTimeError;

    fn try_from(raw: RawBlackout) -> Result<Self> {
        let interval = Self::parse(&raw.start, &raw.end)?;
        Ok(match raw.name {
            Some(name) => interval.with_name(name),
            None => interval,
        })
    }
}

/// A blackout interval realized in a specific zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealizedBlackout<'a> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub name: Option<&'a str>,
}

impl RealizedBlackout<'_> {
    pub fn contains(&self, instant: &DateTime<Tz>) -> bool {
        self.start <= *instant && *instant < self.end
    }
}

/// An ordered, read-only list of blackout intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct BlackoutCalendar {
    intervals: Vec<BlackoutInterval>,
}

impl BlackoutCalendar {
    pub fn new(intervals: Vec<BlackoutInterval>) -> Self {
        Self { intervals }
    }

    /// A calendar with no blackouts.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a calendar from a JSON array of `{"start": ..., "end": ...}` objects.
    ///
    /// # Errors
    ///
    /// Returns [`CallTimeError::InvalidConfig`] if the document is not valid
    /// JSON of that shape, including any interval whose bounds do not parse or
    /// are out of order.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CallTimeError::InvalidConfig(format!("blackout calendar: {}", e)))
    }

    pub fn intervals(&self) -> &[BlackoutInterval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn contains(&self, instant: &DateTime<Tz>) -> bool {
        self.find(instant).is_some()
    }

    /// The first interval, in list order, that contains `instant`.
    pub fn find(&self, instant: &DateTime<Tz>) -> Option<RealizedBlackout<'_>> {
        let tz = instant.timezone();
        self.intervals
            .iter()
            .map(|interval| interval.realize(&tz))
            .find(|realized| realized.contains(instant))
    }

    /// The earliest blackout start `s` with `after < s <= until`.
    pub fn first_start_within(
        &self,
        after: &DateTime<Tz>,
        until: &DateTime<Tz>,
    ) -> Option<DateTime<Tz>> {
        let tz = after.timezone();
        self.intervals
            .iter()
            .map(|interval| resolve_local(&tz, interval.start))
            .filter(|start| after < start && start <= until)
            .min()
    }
}

impl FromIterator<BlackoutInterval> for BlackoutCalendar {
    fn from_iter<I: IntoIterator<Item = BlackoutInterval>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
