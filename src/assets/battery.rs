//! Grid-scale battery storage model.

use serde::{Deserialize, Serialize};

/// Imbalances below this magnitude are ignored to avoid dispatch chatter
/// at equilibrium (MW).
pub const DISPATCH_DEAD_ZONE_MW: f64 = 0.01;

/// A battery energy storage system that helps close the supply/demand gap.
///
/// # Power sign convention
/// - Negative power: discharging into the grid (adds supply)
/// - Positive power: charging from the grid (absorbs surplus)
///
/// `final_supply = supply - power` under this convention, so a discharge
/// (negative power) increases delivered supply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Battery {
    /// Energy capacity in MWh.
    pub capacity_mwh: f64,
    /// Stored energy in MWh, always within `[0, capacity_mwh]`.
    pub charge_mwh: f64,
    /// Symmetric charge/discharge power limit in MW.
    pub max_rate_mw: f64,
    /// Round-trip efficiency, in `(0, 1]`.
    pub efficiency: f64,
    /// Signed power during the most recent tick (display only).
    pub output_mw: f64,
}

impl Battery {
    /// Creates a new battery.
    ///
    /// # Panics
    ///
    /// Panics if capacity is not positive, the initial charge is outside
    /// `[0, capacity]`, the rate is negative, or efficiency is outside `(0, 1]`.
    pub fn new(capacity_mwh: f64, charge_mwh: f64, max_rate_mw: f64, efficiency: f64) -> Self {
        assert!(capacity_mwh > 0.0);
        assert!((0.0..=capacity_mwh).contains(&charge_mwh));
        assert!(max_rate_mw >= 0.0);
        assert!(efficiency > 0.0 && efficiency <= 1.0);

        Self {
            capacity_mwh,
            charge_mwh,
            max_rate_mw,
            efficiency,
            output_mw: 0.0,
        }
    }

    /// Computes the dispatch power for one tick without mutating state.
    ///
    /// A deficit (`load > supply`) discharges up to the rate limit, the
    /// deliverable energy (`charge × efficiency`), and the deficit itself.
    /// A surplus charges up to the rate limit, the absorbable energy
    /// (`headroom / efficiency`), and the surplus. An empty battery cannot
    /// discharge and a full one cannot charge; both cases return 0.
    pub fn dispatch_mw(&self, supply_mw: f64, load_mw: f64) -> f64 {
        let imbalance = load_mw - supply_mw;

        if imbalance.abs() < DISPATCH_DEAD_ZONE_MW {
            return 0.0;
        }

        if imbalance > 0.0 {
            if self.charge_mwh <= 0.0 {
                return 0.0;
            }
            let discharge = self
                .max_rate_mw
                .min(self.charge_mwh * self.efficiency)
                .min(imbalance);
            -discharge
        } else {
            if self.charge_mwh >= self.capacity_mwh {
                return 0.0;
            }
            self.max_rate_mw
                .min((self.capacity_mwh - self.charge_mwh) / self.efficiency)
                .min(-imbalance)
        }
    }

    /// Applies a dispatch decision, updating stored energy for one hour of
    /// operation at `power_mw`.
    ///
    /// Efficiency loss is charged in the direction energy is actually lost:
    /// charging stores `power × efficiency`, discharging draws
    /// `power / efficiency` from the cells. The charge is clamped to the
    /// physical range as a final safeguard.
    pub fn apply_dispatch(&mut self, power_mw: f64) {
        let energy_change_mwh = if power_mw > 0.0 {
            power_mw * self.efficiency
        } else {
            power_mw / self.efficiency
        };
        self.charge_mwh = (self.charge_mwh + energy_change_mwh).clamp(0.0, self.capacity_mwh);
        self.output_mw = power_mw;
    }

    /// Expands capacity and rate limits, preserving the stored charge.
    pub fn upgrade(&mut self, added_capacity_mwh: f64, added_rate_mw: f64) {
        assert!(added_capacity_mwh >= 0.0);
        assert!(added_rate_mw >= 0.0);
        self.capacity_mwh += added_capacity_mwh;
        self.max_rate_mw += added_rate_mw;
    }
}
