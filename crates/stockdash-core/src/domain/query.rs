use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::{DataError, Interval, Period, Ticker};

/// Exact parameter tuple of a historical fetch; doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QueryKey {
    ticker: Ticker,
    period: Period,
    interval: Interval,
}

impl QueryKey {
    /// Build a key, rejecting intervals the provider does not serve over `period`.
    pub fn new(ticker: Ticker, period: Period, interval: Interval) -> Result<Self, DataError> {
        if !is_supported(period, interval) {
            return Err(DataError::UnsupportedCombination { period, interval });
        }
        Ok(Self {
            ticker,
            period,
            interval,
        })
    }

    /// Parse a raw ticker and build the key.
    pub fn parse(ticker: &str, period: Period, interval: Interval) -> Result<Self, DataError> {
        let ticker = Ticker::parse(ticker).map_err(DataError::InvalidTicker)?;
        Self::new(ticker, period, interval)
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub const fn period(&self) -> Period {
        self.period
    }

    pub const fn interval(&self) -> Interval {
        self.interval
    }
}

impl Display for QueryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.ticker, self.period, self.interval)
    }
}

/// Whether the provider honors `interval` across the whole of `period`.
pub const fn is_supported(period: Period, interval: Interval) -> bool {
    match (interval.max_lookback_days(), period.lookback_days()) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(max), Some(days)) => days <= max,
    }
}

/// Intervals a page may offer for `period`, in ascending granularity.
pub fn supported_intervals(period: Period) -> Vec<Interval> {
    Interval::ALL
        .into_iter()
        .filter(|interval| is_supported(period, *interval))
        .collect()
}
