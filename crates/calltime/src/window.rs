//! Call-time window orchestration.
//!
//! Resolves the window's start to the next open instant, then grows the end
//! one quantum at a time until the requested duration is covered.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::advance::{advance_window_end, QUANTUM_MINUTES};
use crate::blackout::BlackoutCalendar;
use crate::clock::{parse_instant, parse_timezone};
use crate::error::{CallTimeError, Result};
use crate::open::next_open_instant;
use crate::schedule::{BusinessHours, WeeklySchedule};
use crate::weekday::adapt_schedule;

// ── Result ──────────────────────────────────────────────────────────────────

/// A resolved call window in absolute time.
///
/// Serializes both bounds as UTC ISO-8601 with millisecond precision,
/// e.g. `"2024-10-09T17:00:00.000Z"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallTimeWindow {
    #[serde(serialize_with = "serialize_utc_millis")]
    pub start: DateTime<Utc>,
    #[serde(serialize_with = "serialize_utc_millis")]
    pub end: DateTime<Utc>,
}

impl CallTimeWindow {
    pub fn start_iso(&self) -> String {
        format_utc_millis(&self.start)
    }

    pub fn end_iso(&self) -> String {
        format_utc_millis(&self.end)
    }
}

impl fmt::Display for CallTimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start_iso(), self.end_iso())
    }
}

fn format_utc_millis(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_utc_millis<S: Serializer>(
    dt: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_utc_millis(dt))
}

// ── Request ─────────────────────────────────────────────────────────────────

/// A call-window request in caller terms.
///
/// Field names accept both `snake_case` and the `camelCase` spelling used by
/// existing JSON payloads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CallTimeRequest {
    /// Local wall-clock timestamp in `time_zone`, or an RFC 3339 instant.
    pub start: String,
    /// IANA time zone name, e.g. `"America/Chicago"`.
    #[serde(alias = "timeZone")]
    pub time_zone: String,
    /// Positive multiple of [`QUANTUM_MINUTES`].
    #[serde(alias = "durationMinutes")]
    pub duration_minutes: i64,
    #[serde(alias = "businessHours")]
    pub business_hours: BusinessHours,
}

impl CallTimeRequest {
    /// # Errors
    ///
    /// Returns [`CallTimeError::InvalidConfig`] if `json` is not a request
    /// document, including one whose business hours do not parse.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CallTimeError::InvalidConfig(format!("call-time request: {}", e)))
    }
}

// ── Orchestration ───────────────────────────────────────────────────────────

/// Check a duration and return how many quanta it spans.
///
/// # Errors
///
/// Returns [`CallTimeError::InvalidDuration`] unless `duration_minutes` is a
/// positive multiple of [`QUANTUM_MINUTES`].
pub fn validate_duration(duration_minutes: i64) -> Result<i64> {
    if duration_minutes <= 0 {
        return Err(CallTimeError::InvalidDuration(format!(
            "{} minutes: must be positive",
            duration_minutes
        )));
    }
    if duration_minutes % QUANTUM_MINUTES != 0 {
        return Err(CallTimeError::InvalidDuration(format!(
            "{} minutes: must be a multiple of {}",
            duration_minutes, QUANTUM_MINUTES
        )));
    }
    Ok(duration_minutes / QUANTUM_MINUTES)
}

/// Compute the call window for a typed start instant.
///
/// # Errors
///
/// Returns [`CallTimeError::InvalidDuration`] for a bad duration and
/// [`CallTimeError::ScheduleUnsatisfiable`] when no opening can be found.
pub fn compute_window(
    start: &DateTime<Tz>,
    duration_minutes: i64,
    schedule: &WeeklySchedule,
    calendar: &BlackoutCalendar,
) -> Result<CallTimeWindow> {
    let quanta = validate_duration(duration_minutes)?;

    let window_start = next_open_instant(start, schedule, calendar)?;
    let mut window_end = window_start;
    for _ in 0..quanta {
        window_end = advance_window_end(&window_end, schedule, calendar)?;
    }

    debug!(
        requested = %start,
        start = %window_start,
        end = %window_end,
        duration_minutes,
        "resolved call window"
    );

    Ok(CallTimeWindow {
        start: window_start.with_timezone(&Utc),
        end: window_end.with_timezone(&Utc),
    })
}

/// Compute the call window for a request expressed in caller terms.
///
/// Validates everything (duration, zone, start, business hours) before any
/// resolution runs.
///
/// # Errors
///
/// Returns the validation error for the first bad input, or
/// [`CallTimeError::ScheduleUnsatisfiable`] when no opening can be found.
///
/// # Examples
///
/// ```
/// use calltime::{get_call_time_window, BlackoutCalendar, CallTimeRequest};
///
/// let request = CallTimeRequest::from_json(r#"{
///     "start": "2024-10-09T10:00:00.000",
///     "timeZone": "America/Chicago",
///     "durationMinutes": 120,
///     "businessHours": {
///         "0": null,
///         "1": {"open": "08:30", "close": "17:00"},
///         "2": {"open": "08:30", "close": "17:00"},
///         "3": {"open": "08:30", "close": "17:00"},
///         "4": {"open": "08:30", "close": "17:00"},
///         "5": {"open": "08:30", "close": "17:00"},
///         "6": null
///     }
/// }"#).unwrap();
///
/// let window = get_call_time_window(&request, &BlackoutCalendar::empty()).unwrap();
/// assert_eq!(window.start_iso(), "2024-10-09T15:00:00.000Z");
/// assert_eq!(window.end_iso(), "2024-10-09T17:00:00.000Z");
/// ```
pub fn get_call_time_window(
    request: &CallTimeRequest,
    calendar: &BlackoutCalendar,
) -> Result<CallTimeWindow> {
    validate_duration(request.duration_minutes)?;
    let tz = parse_timezone(&request.time_zone)?;
    let start = parse_instant(&request.start, &tz)?;
    let schedule = adapt_schedule(&request.business_hours)?;

    compute_window(&start, request.duration_minutes, &schedule, calendar)
}
