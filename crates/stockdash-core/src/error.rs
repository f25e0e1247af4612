use thiserror::Error;

use crate::source::SourceError;
use crate::{Interval, Period};

/// Validation and contract errors exposed by `stockdash-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker must start with an ASCII letter: '{ch}'")]
    TickerInvalidStart { ch: char },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },

    #[error(
        "invalid period '{value}', expected one of 1d, 5d, 7d, 15d, 30d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max"
    )]
    InvalidPeriod { value: String },
    #[error("invalid interval '{value}', expected one of 1m, 2m, 5m, 15m, 30m, 1h, 1d, 5d, 1wk, 1mo, 3mo")]
    InvalidInterval { value: String },

    #[error("timestamp must be RFC3339 with an explicit offset: '{value}'")]
    InvalidTimestamp { value: String },
    #[error("utc offset of {seconds} seconds is out of range")]
    InvalidOffset { seconds: i64 },

    #[error("currency must be a 3-letter uppercase ISO code: '{value}'")]
    InvalidCurrency { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
}

/// Caller-facing errors of the fetch and transform layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataError {
    #[error("invalid ticker: {0}")]
    InvalidTicker(#[source] ValidationError),

    #[error("interval '{interval}' is not available for period '{period}'")]
    UnsupportedCombination { period: Period, interval: Interval },

    #[error("market data unavailable: {0}")]
    DataUnavailable(#[from] SourceError),

    #[error("series is empty; statistics are undefined for zero observations")]
    EmptySeries,

    #[error("moving average window must be at least 2, got {window}")]
    InvalidWindow { window: usize },
}

impl DataError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidTicker(_) => "data.invalid_ticker",
            Self::UnsupportedCombination { .. } => "data.unsupported_combination",
            Self::DataUnavailable(_) => "data.unavailable",
            Self::EmptySeries => "data.empty_series",
            Self::InvalidWindow { .. } => "data.invalid_window",
        }
    }
}
