//! Market samples and the hourly market-data provider.

use std::error::Error;
use std::fmt;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Length of one fetched market window in hours (one week).
pub const MARKET_WINDOW_HOURS: usize = 168;

/// One hour of exogenous market data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSample {
    /// Calendar date of the sample.
    pub date: NaiveDate,
    /// Hour of day, 0–23.
    pub hour: u8,
    /// System load at the reference customer base in MW.
    pub load_mw: f64,
    /// Solar availability in `[0, 1]`.
    pub solar_factor: f64,
    /// Wind availability in `[0, 1]`.
    pub wind_factor: f64,
}

/// Error returned by a market-data provider.
///
/// The orchestrator treats provider failure as a degraded condition and
/// keeps using the last-known window; it never aborts a tick.
#[derive(Debug)]
pub struct MarketDataError {
    /// Human-readable failure description.
    pub message: String,
}

impl MarketDataError {
    /// Wraps a failure description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for MarketDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "market data error: {}", self.message)
    }
}

impl Error for MarketDataError {}

/// A source of hourly market windows.
///
/// Implementations must return samples ordered ascending in time,
/// contiguous, with zero-filled gaps for missing hours.
pub trait MarketDataSource {
    /// Fetches `length_hours` contiguous samples starting at the given
    /// date and hour.
    fn market_window(
        &mut self,
        start: NaiveDate,
        start_hour: u8,
        length_hours: usize,
    ) -> Result<Vec<MarketSample>, MarketDataError>;
}

/// Gaussian noise via the Box-Muller transform, mean 0.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

/// Seeded synthetic market data for offline runs and tests.
///
/// Load follows a daily sinusoid with gaussian noise, solar a clear-sky
/// bell between sunrise and sunset with noise, and wind an AR(1) process
/// so gusts persist across hours. Deterministic for a fixed seed and
/// call sequence.
#[derive(Debug, Clone)]
pub struct SyntheticMarketData {
    base_load_mw: f64,
    amp_load_mw: f64,
    load_noise_std: f64,
    wind_alpha: f64,
    wind_state: f64,
    rng: StdRng,
}

/// Sunrise hour (inclusive) for the clear-sky solar curve.
const SUNRISE_HOUR: u8 = 6;
/// Sunset hour (exclusive) for the clear-sky solar curve.
const SUNSET_HOUR: u8 = 18;

impl SyntheticMarketData {
    /// Creates a provider with the default demand profile.
    pub fn new(seed: u64) -> Self {
        Self::with_profile(seed, 1000.0, 300.0, 25.0)
    }

    /// Creates a provider with a custom demand profile.
    pub fn with_profile(seed: u64, base_load_mw: f64, amp_load_mw: f64, load_noise_std: f64) -> Self {
        Self {
            base_load_mw,
            amp_load_mw,
            load_noise_std,
            wind_alpha: 0.85,
            wind_state: 0.5,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn load_at(&mut self, hour: u8) -> f64 {
        // Evening peak around 18:00
        let phase = 2.0 * std::f64::consts::PI * (f64::from(hour) - 12.0) / 24.0;
        let load = self.base_load_mw
            + self.amp_load_mw * phase.sin()
            + gaussian_noise(&mut self.rng, self.load_noise_std);
        load.max(0.0)
    }

    fn solar_at(&mut self, hour: u8) -> f64 {
        if !(SUNRISE_HOUR..SUNSET_HOUR).contains(&hour) {
            return 0.0;
        }
        let span = f64::from(SUNSET_HOUR - SUNRISE_HOUR);
        let position = (f64::from(hour) - f64::from(SUNRISE_HOUR)) / span;
        let clear_sky = (std::f64::consts::PI * position).sin();
        (clear_sky + gaussian_noise(&mut self.rng, 0.05)).clamp(0.0, 1.0)
    }

    fn wind_next(&mut self) -> f64 {
        let innovation = gaussian_noise(&mut self.rng, 0.1);
        self.wind_state =
            (self.wind_alpha * self.wind_state + (1.0 - self.wind_alpha) * 0.5 + innovation)
                .clamp(0.0, 1.0);
        self.wind_state
    }
}

impl MarketDataSource for SyntheticMarketData {
    fn market_window(
        &mut self,
        start: NaiveDate,
        start_hour: u8,
        length_hours: usize,
    ) -> Result<Vec<MarketSample>, MarketDataError> {
        if start_hour > 23 {
            return Err(MarketDataError {
                message: format!("start hour {start_hour} out of range 0..=23"),
            });
        }

        let mut samples = Vec::with_capacity(length_hours);
        let mut date = start;
        let mut hour = start_hour;

        for _ in 0..length_hours {
            samples.push(MarketSample {
                date,
                hour,
                load_mw: self.load_at(hour),
                solar_factor: self.solar_at(hour),
                wind_factor: self.wind_next(),
            });

            hour += 1;
            if hour >= 24 {
                hour = 0;
                date = date.succ_opt().unwrap_or(date);
            }
        }

        Ok(samples)
    }
}
