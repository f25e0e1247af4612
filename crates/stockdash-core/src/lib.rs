//! # Stockdash Core
//!
//! Data layer for a stock dashboard: validated, cached access to historical
//! OHLCV series plus the pure transforms the dashboard pages render.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo chart endpoint) |
//! | [`cache`] | TTL cache keyed by (ticker, period, interval) |
//! | [`chart`] | Serializable chart payloads for an external renderer |
//! | [`config`] | Data layer configuration |
//! | [`data_access`] | Fetch / cache / quote entry point |
//! | [`domain`] | Domain models (Ticker, Period, Interval, Bar, Series, Quote) |
//! | [`error`] | Validation and data errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`source`] | Market-data source trait and structured source errors |
//! | [`transform`] | Moving average, day partition, descriptive statistics |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stockdash_core::{describe, DataAccess, DataAccessConfig, Interval, Period};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let access = DataAccess::from_config(DataAccessConfig::default());
//!     let series = access.fetch("MSFT", Period::OneMonth, Interval::OneDay).await?;
//!     let stats = describe(&series)?;
//!     println!("{}", serde_json::to_string_pretty(&stats)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI pages      │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  DataAccess     │────▶│ SeriesCache      │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ MarketDataSource│────▶│ HTTP Client      │
//! │ (YahooSource)   │     │ (reqwest)        │
//! └─────────────────┘     └──────────────────┘
//!
//!   Series ──▶ transform (moving_average, partition_by_day, describe)
//!          ──▶ chart payloads
//! ```

pub mod adapters;
pub mod cache;
pub mod chart;
pub mod config;
pub mod data_access;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod source;
pub mod transform;

pub use adapters::{YahooSource, YAHOO_BASE_URL};
pub use cache::{SeriesCache, DEFAULT_CACHE_TTL};
pub use chart::{
    candlestick_with_volume, intraday_candlestick, line_chart, moving_average_chart,
    CandleColors, ChartOptions, ChartPayload, LinePoint, Trace, VolumePoint,
};
pub use config::DataAccessConfig;
pub use data_access::{DataAccess, Fetched};
pub use domain::*;
pub use error::{DataError, ValidationError};
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, DEFAULT_TIMEOUT_MS,
};
pub use source::{MarketDataSource, QuoteSnapshot, SourceError, SourceErrorKind};
pub use transform::{
    describe, moving_average, partition_by_day, FieldSummary, MovingAveragePoint,
    SeriesDescription, SeriesField,
};
