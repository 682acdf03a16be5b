//! Shared fixtures for integration tests.

#![allow(dead_code)]

use calltime::{adapt_schedule, BlackoutCalendar, BusinessHours, WeeklySchedule};

/// Monday-Friday 08:30-17:00 in the legacy `start`/`end` shape callers store.
pub const STANDARD_HOURS_JSON: &str = r#"{
    "0": { "start": null, "end": null },
    "1": { "start": "08:30:000", "end": "17:00:000" },
    "2": { "start": "08:30:000", "end": "17:00:000" },
    "3": { "start": "08:30:000", "end": "17:00:000" },
    "4": { "start": "08:30:000", "end": "17:00:000" },
    "5": { "start": "08:30:000", "end": "17:00:000" },
    "6": { "start": null, "end": null }
}"#;

pub const ALL_CLOSED_HOURS_JSON: &str = r#"{
    "0": null, "1": null, "2": null, "3": null, "4": null, "5": null, "6": null
}"#;

pub fn standard_hours() -> BusinessHours {
    serde_json::from_str(STANDARD_HOURS_JSON).expect("standard hours fixture")
}

pub fn standard_schedule() -> WeeklySchedule {
    adapt_schedule(&standard_hours()).expect("standard hours adapt")
}

/// The holiday calendar the regression tables were recorded against.
pub fn holidays() -> BlackoutCalendar {
    BlackoutCalendar::from_json(include_str!("../fixtures/holidays.json"))
        .expect("holiday fixture")
}

/// Route `tracing` output through the test harness; `RUST_LOG` selects levels.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
