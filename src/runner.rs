//! Run orchestration: market-data scheduling, collapse detection.

use chrono::NaiveDate;

use crate::market::{MarketDataSource, MarketSample, MARKET_WINDOW_HOURS};
use crate::sim::engine::Engine;
use crate::sim::state::{SimulationState, TickResult};
use crate::sim::summary::{EndReason, RunSummary};
use crate::sim::NOMINAL_FREQUENCY_HZ;

/// Absolute frequency deviation at which the grid collapses and the run
/// ends, in Hz.
pub const COLLAPSE_DEVIATION_HZ: f64 = 2.0;

/// How often the market window is refetched, in simulated days.
const MARKET_REFRESH_DAYS: i64 = 7;

/// Drives an [`Engine`] against a market data source.
///
/// Owns the fetched market window and a cursor into it, refetching a
/// week ahead at simulated midnight. A failed or empty fetch keeps the
/// previous window; once that is exhausted, ticks proceed without market
/// data and the engine degrades per its no-sample policy.
pub struct Runner<S: MarketDataSource> {
    engine: Engine,
    source: S,
    window: Vec<MarketSample>,
    cursor: usize,
    last_fetch_date: Option<NaiveDate>,
    collapsed: bool,
}

impl<S: MarketDataSource> Runner<S> {
    /// Creates a runner over an initial state and a market data source.
    pub fn new(state: SimulationState, source: S) -> Self {
        Self {
            engine: Engine::new(state),
            source,
            window: Vec::new(),
            cursor: 0,
            last_fetch_date: None,
            collapsed: false,
        }
    }

    /// Returns the underlying engine for inspection.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Returns the underlying engine for operator actions.
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Whether the run has ended in a grid collapse.
    pub fn collapsed(&self) -> bool {
        self.collapsed
    }

    /// Executes one tick, or returns `None` when the run is paused or has
    /// collapsed.
    pub fn step(&mut self) -> Option<TickResult> {
        if !self.engine.state().network.is_running {
            return None;
        }

        if self.should_refresh() {
            self.refresh_window();
        }

        let sample = self.window.get(self.cursor).copied();
        if sample.is_some() {
            self.cursor += 1;
        }

        let result = self.engine.tick(sample.as_ref());

        if (result.frequency_hz - NOMINAL_FREQUENCY_HZ).abs() > COLLAPSE_DEVIATION_HZ {
            self.collapsed = true;
            self.engine.pause();
        }

        Some(result)
    }

    /// Runs until paused, collapsed, or `max_ticks` ticks have executed.
    pub fn run(&mut self, max_ticks: u64) -> Vec<TickResult> {
        let mut results = Vec::new();
        for _ in 0..max_ticks {
            match self.step() {
                Some(result) => results.push(result),
                None => break,
            }
        }
        results
    }

    /// Summarizes the run as it stands.
    pub fn summary(&self) -> RunSummary {
        let reason = if self.collapsed {
            EndReason::NetworkFailure
        } else {
            EndReason::Manual
        };
        RunSummary::from_state(self.engine.state(), reason)
    }

    fn should_refresh(&self) -> bool {
        if self.cursor >= self.window.len() {
            return true;
        }
        let clock = &self.engine.state().clock;
        match self.last_fetch_date {
            Some(date) => clock.hour == 0 && clock.days_since(date) >= MARKET_REFRESH_DAYS,
            None => true,
        }
    }

    fn refresh_window(&mut self) {
        // the tick about to run advances the clock first, so fetch from
        // the hour after the current clock position
        let clock = self.engine.state().clock;
        let (start, start_hour) = if clock.hour >= 23 {
            (clock.date.succ_opt().unwrap_or(clock.date), 0)
        } else {
            (clock.date, clock.hour + 1)
        };

        match self
            .source
            .market_window(start, start_hour, MARKET_WINDOW_HOURS)
        {
            Ok(window) if !window.is_empty() => {
                self.window = window;
                self.cursor = 0;
                self.last_fetch_date = Some(clock.date);
            }
            // keep serving the stale window; a later refresh may succeed
            Ok(_) | Err(_) => {}
        }
    }
}
