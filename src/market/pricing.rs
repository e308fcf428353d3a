//! Frequency-stability based market pricing.

use serde::{Deserialize, Serialize};

/// Number of deviation samples collected before each price recalculation.
pub const PRICE_WINDOW_LEN: usize = 12;

/// Price paid for perfectly stable operation in $/MWh.
const PRICE_CEILING: f64 = 200.0;
/// Hard price floor in $/MWh.
const PRICE_FLOOR: f64 = 20.0;
/// Deviation (Hz) at which the normalized average saturates.
const DEVIATION_SCALE_HZ: f64 = 1.0;
/// Penalty in $/MWh per Hz of the worst excursion once it exceeds 1 Hz.
const SPIKE_PENALTY_PER_HZ: f64 = 30.0;

/// Market price state driven by recent frequency deviations.
///
/// Absolute deviations accumulate into a fixed-length window; the price
/// recomputes exactly when the window fills and the window then resets, so
/// the price holds constant for `PRICE_WINDOW_LEN - 1` ticks between
/// updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketState {
    /// Current clearing price in $/MWh.
    pub price_per_mwh: f64,
    /// Absolute frequency deviations since the last recalculation.
    pub deviation_window: Vec<f64>,
    /// Tick of the most recent price update, if any.
    pub last_price_update_tick: Option<u64>,
}

impl MarketState {
    /// Creates the opening market state at the given price.
    pub fn new(opening_price_per_mwh: f64) -> Self {
        Self {
            price_per_mwh: opening_price_per_mwh,
            deviation_window: Vec::with_capacity(PRICE_WINDOW_LEN),
            last_price_update_tick: None,
        }
    }

    /// Records one absolute frequency deviation sample.
    ///
    /// Returns `true` when the window filled and the price was recomputed
    /// this tick; the window is cleared afterwards.
    pub fn record_deviation(&mut self, deviation_hz: f64, tick: u64) -> bool {
        self.deviation_window.push(deviation_hz);
        if self.deviation_window.len() < PRICE_WINDOW_LEN {
            return false;
        }

        self.price_per_mwh = clearing_price(&self.deviation_window);
        self.deviation_window.clear();
        self.last_price_update_tick = Some(tick);
        true
    }
}

impl Default for MarketState {
    fn default() -> Self {
        Self::new(50.0)
    }
}

/// Derives a clearing price from a window of absolute frequency deviations.
///
/// The average deviation maps linearly onto the $20–$200 band; a worst-case
/// excursion above 1 Hz takes an additional penalty so a single bad spike
/// moves the price even when the average looks acceptable.
pub fn clearing_price(deviations: &[f64]) -> f64 {
    if deviations.is_empty() {
        return PRICE_CEILING;
    }

    let avg: f64 = deviations.iter().sum::<f64>() / deviations.len() as f64;
    let normalized = (avg / DEVIATION_SCALE_HZ).min(1.0);
    let mut price = PRICE_CEILING - normalized * (PRICE_CEILING - PRICE_FLOOR);

    let max_deviation = deviations.iter().copied().fold(0.0, f64::max);
    if max_deviation > 1.0 {
        price = (price - SPIKE_PENALTY_PER_HZ * max_deviation).max(PRICE_FLOOR);
    }

    price
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_stability_earns_the_ceiling() {
        let price = clearing_price(&[0.0; PRICE_WINDOW_LEN]);
        assert_eq!(price, 200.0);
    }

    #[test]
    fn saturated_average_hits_the_floor_band() {
        let price = clearing_price(&[1.0; PRICE_WINDOW_LEN]);
        assert_eq!(price, 20.0);
    }

    #[test]
    fn moderate_average_maps_linearly() {
        // avg 0.5 → 200 - 0.5 * 180 = 110
        let price = clearing_price(&[0.5; PRICE_WINDOW_LEN]);
        assert!((price - 110.0).abs() < 1e-9);
    }

    #[test]
    fn single_spike_takes_a_penalty() {
        let mut window = [0.0; PRICE_WINDOW_LEN];
        window[3] = 1.5;
        // avg = 0.125 → 177.5 base; spike penalty 30 * 1.5 = 45
        let price = clearing_price(&window);
        assert!((price - 132.5).abs() < 1e-9);
    }

    #[test]
    fn price_never_drops_below_the_floor() {
        let price = clearing_price(&[5.0; PRICE_WINDOW_LEN]);
        assert_eq!(price, 20.0);
    }

    #[test]
    fn price_holds_until_the_window_fills() {
        let mut market = MarketState::new(50.0);
        for tick in 1..PRICE_WINDOW_LEN as u64 {
            assert!(!market.record_deviation(0.0, tick));
            assert_eq!(market.price_per_mwh, 50.0);
        }
        assert!(market.record_deviation(0.0, PRICE_WINDOW_LEN as u64));
        assert_eq!(market.price_per_mwh, 200.0);
        assert_eq!(market.last_price_update_tick, Some(PRICE_WINDOW_LEN as u64));
        assert!(market.deviation_window.is_empty());
    }

    #[test]
    fn cadence_repeats_after_each_recalculation() {
        let mut market = MarketState::default();
        let mut update_ticks = Vec::new();
        for tick in 1..=36 {
            if market.record_deviation(0.2, tick) {
                update_ticks.push(tick);
            }
        }
        assert_eq!(update_ticks, vec![12, 24, 36]);
    }
}
