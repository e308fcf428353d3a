//! Market data supply and frequency-driven pricing.

/// Market samples and the hourly market-data provider.
pub mod data;
/// Deviation-window clearing price model.
pub mod pricing;

pub use data::{
    MARKET_WINDOW_HOURS, MarketDataError, MarketDataSource, MarketSample, SyntheticMarketData,
};
pub use pricing::MarketState;
