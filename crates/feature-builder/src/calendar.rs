//! Departure Calendar Signals
//!
//! Period-of-day and high-season derivation from the scheduled departure.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Period of the day a departure falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodOfDay {
    Morning,
    Afternoon,
    Night,
}

impl PeriodOfDay {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodOfDay::Morning => "morning",
            PeriodOfDay::Afternoon => "afternoon",
            PeriodOfDay::Night => "night",
        }
    }
}

// Interval bounds in seconds from midnight. All bounds are exclusive: a
// departure at exactly 05:00:00 or 11:59:00 belongs to no period.
const MORNING_START: u32 = 5 * 3600; // 05:00:00
const MORNING_END: u32 = 11 * 3600 + 59 * 60; // 11:59:00
const AFTERNOON_START: u32 = 12 * 3600; // 12:00:00
const AFTERNOON_END: u32 = 18 * 3600 + 59 * 60; // 18:59:00
const EVENING_START: u32 = 19 * 3600; // 19:00:00
const EVENING_END: u32 = 23 * 3600 + 59 * 60; // 23:59:00
const NIGHT_START: u32 = 0; // 00:00:00
const NIGHT_END: u32 = 4 * 3600 + 59 * 60; // 04:59:00

/// Classify a departure time into a period of day
///
/// Returns `None` for times that fall exactly on an interval bound.
pub fn period_of_day(time: NaiveTime) -> Option<PeriodOfDay> {
    let s = time.num_seconds_from_midnight();

    if s > MORNING_START && s < MORNING_END {
        Some(PeriodOfDay::Morning)
    } else if s > AFTERNOON_START && s < AFTERNOON_END {
        Some(PeriodOfDay::Afternoon)
    } else if (s > EVENING_START && s < EVENING_END) || (s > NIGHT_START && s < NIGHT_END) {
        Some(PeriodOfDay::Night)
    } else {
        None
    }
}

/// Whether a calendar date falls in the high season
///
/// High season covers Dec 15-31, Jan 1-Mar 3, Jul 15-31 and Sep 11-30,
/// inclusive on both ends, evaluated against the date's own year.
pub fn is_high_season(date: NaiveDate) -> bool {
    let day = (date.month(), date.day());

    in_range(day, (12, 15), (12, 31))
        || in_range(day, (1, 1), (3, 3))
        || in_range(day, (7, 15), (7, 31))
        || in_range(day, (9, 11), (9, 30))
}

fn in_range(day: (u32, u32), start: (u32, u32), end: (u32, u32)) -> bool {
    day >= start && day <= end
}
