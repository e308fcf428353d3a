//! Simulated calendar clock.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// First simulated day; the calendar wraps back here past the ceiling.
pub const SIM_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2024, 1, 1) {
    Some(date) => date,
    None => panic!("epoch date is valid"),
};

/// Last simulated year; the shipped market data covers one year.
const CALENDAR_CEILING_YEAR: i32 = 2024;

/// Tracks the simulated date and hour, advancing one hour per tick.
///
/// # Examples
///
/// ```
/// use gridop::sim::clock::SimClock;
///
/// let mut clock = SimClock::start();
/// for _ in 0..25 {
///     clock.advance();
/// }
/// assert_eq!(clock.hour, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimClock {
    /// Current simulated date.
    pub date: NaiveDate,
    /// Current simulated hour, 0–23.
    pub hour: u8,
}

impl SimClock {
    /// Creates a clock at the simulation epoch, midnight.
    pub fn start() -> Self {
        Self {
            date: SIM_EPOCH,
            hour: 0,
        }
    }

    /// Advances one simulated hour, rolling the day over at midnight and
    /// wrapping to the epoch once the calendar ceiling is passed.
    pub fn advance(&mut self) {
        self.hour += 1;
        if self.hour >= 24 {
            self.hour = 0;
            let next = self.date.succ_opt().unwrap_or(SIM_EPOCH);
            self.date = if next.year() > CALENDAR_CEILING_YEAR {
                SIM_EPOCH
            } else {
                next
            };
        }
    }

    /// Whole days elapsed since the given date (negative if in the future).
    pub fn days_since(&self, earlier: NaiveDate) -> i64 {
        (self.date - earlier).num_days()
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::start()
    }
}
