//! # calltime
//!
//! Deterministic call-time windows.
//!
//! Given a requested start, a duration, a weekly business-hours table and a
//! blackout calendar, computes the window `[start, end]` in which a call can
//! take place: the start is moved to the next open instant, and the end grows
//! in 30-minute quanta that skip closed hours, closed days and blackouts,
//! carrying any overrun past a closing time into the next opening.
//!
//! All day and time-of-day reasoning happens on the wall clock of a
//! caller-supplied IANA time zone; results are returned in UTC.
//!
//! ## Modules
//!
//! - [`schedule`] — Business-hours tables (caller-facing and resolver-facing)
//! - [`weekday`] — Application ↔ ISO weekday numbering
//! - [`hours`] — Opening intervals for a date, in-hours checks
//! - [`blackout`] — Holiday and closure calendar
//! - [`open`] — Next open instant
//! - [`advance`] — One quantum of window growth
//! - [`window`] — Window orchestration and the caller-facing request
//! - [`clock`] — Wall-clock parsing and zone projection
//! - [`error`] — Error types

pub mod advance;
pub mod blackout;
pub mod clock;
pub mod error;
pub mod hours;
pub mod open;
pub mod schedule;
pub mod weekday;
pub mod window;

pub use advance::{advance_window_end, QUANTUM_MINUTES};
pub use blackout::{BlackoutCalendar, BlackoutInterval, RealizedBlackout};
pub use clock::{parse_instant, parse_timezone};
pub use error::CallTimeError;
pub use hours::{hours_for, interval_for, is_within_operating_hours, OperatingInterval};
pub use open::{is_open_instant, next_open_instant};
pub use schedule::{BusinessHours, DayHours, OperatingDay, WeeklySchedule};
pub use weekday::adapt_schedule;
pub use window::{
    compute_window, get_call_time_window, validate_duration, CallTimeRequest, CallTimeWindow,
};
