//! Error types for call-time window computation.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallTimeError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid time of day: {0}")]
    InvalidTimeOfDay(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid blackout interval: {0}")]
    InvalidBlackout(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// An operating interval was requested for a closed day. Indicates a
    /// caller defect, never a recoverable condition.
    #[error("Not an operating day: {0}")]
    NotOperating(String),

    /// No open, non-blackout instant exists within the search bounds.
    #[error("Schedule unsatisfiable: {0}")]
    ScheduleUnsatisfiable(String),
}

pub type Result<T> = std::result::Result<T, CallTimeError>;
