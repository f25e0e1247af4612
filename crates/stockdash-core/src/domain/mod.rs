//! # Domain Models
//!
//! Canonical domain types for stockdash market data.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Validated, uppercase stock ticker |
//! | [`Period`] | Lookback window (`1d` .. `max`) |
//! | [`Interval`] | Sampling granularity (`1m` .. `3mo`) |
//! | [`QueryKey`] | Validated (ticker, period, interval) tuple, the cache key |
//! | [`MarketTimestamp`] | Instant carrying the exchange-local offset |
//! | [`Bar`] | OHLCV sample |
//! | [`Series`] | Chronological, de-duplicated bars for one query |
//! | [`Quote`] | Best-effort latest price and currency |
//! | [`IntradayPartition`] | Bars grouped by local trading date |
//!
//! ## Supported combinations
//!
//! Intraday intervals are only served over short windows: `1m` up to 7 days,
//! `2m`..`30m` up to 60 days, `1h` up to 730 days. [`QueryKey::new`] rejects
//! anything else with [`DataError::UnsupportedCombination`](crate::DataError).

mod interval;
mod models;
mod period;
mod query;
mod ticker;
mod timestamp;

pub use interval::Interval;
pub use models::{
    validate_currency_code, Bar, IntradayPartition, Quote, Series, DEFAULT_CURRENCY,
};
pub use period::Period;
pub use query::{is_supported, supported_intervals, QueryKey};
pub use ticker::Ticker;
pub use timestamp::MarketTimestamp;
