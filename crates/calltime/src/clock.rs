//! Wall-clock parsing and zone projection helpers.
//!
//! Everything the resolver knows about a day (its weekday, its opening time,
//! where an instant sits relative to closing) is read from the zone's local
//! wall clock. These helpers are the single place where local wall-clock
//! values are turned into absolute instants and back.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::error::{CallTimeError, Result};

/// tzdb transitions never skip more than a day of wall-clock time.
const MAX_GAP_MINUTES: i64 = 24 * 60;

const WALL_CLOCK_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| CallTimeError::InvalidTimezone(format!("'{}'", s)))
}

/// Parse a local wall-clock timestamp with no offset.
///
/// Accepts `2024-10-09T10:00:00.000`, `2024-10-09T10:00:00`,
/// `2024-10-09T10:00`, `2024-10-09 10:00:00` and a bare date
/// (`2024-10-09`, read as midnight).
pub fn parse_wall_clock(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    for format in WALL_CLOCK_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|e| CallTimeError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// Parse a timestamp into an instant projected onto `tz`.
///
/// RFC 3339 input (`2024-03-08T20:11:15.000Z`) names an absolute instant and
/// is converted into the zone. Input without an offset is a wall-clock time in
/// the zone itself.
pub fn parse_instant(s: &str, tz: &Tz) -> Result<DateTime<Tz>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s.trim()) {
        return Ok(dt.with_timezone(tz));
    }
    parse_wall_clock(s).map(|naive| resolve_local(tz, naive))
}

/// Realize a wall-clock time in `tz`.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times that fall in
/// a DST gap move forward to the first wall-clock minute that exists.
pub fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    let mut probe = naive;
    for _ in 0..=MAX_GAP_MINUTES {
        if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
            return dt;
        }
        probe += Duration::minutes(1);
    }
    tz.from_utc_datetime(&naive)
}

/// Realize `time` on `date` in `tz`.
pub fn local_instant(tz: &Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
    resolve_local(tz, date.and_time(time))
}
