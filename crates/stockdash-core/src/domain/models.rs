use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{MarketTimestamp, QueryKey, Ticker, ValidationError};

/// Currency assumed when the provider omits one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// One OHLCV sample for a fixed time bucket.
///
/// Prices are checked for finiteness and sign only; `low <= open/close <= high`
/// is assumed of the provider and not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BarFields")]
pub struct Bar {
    pub ts: MarketTimestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    pub fn new(
        ts: MarketTimestamp,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        Ok(Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Unchecked wire shape of a [`Bar`]; deserialization goes through [`Bar::new`].
#[derive(Deserialize)]
struct BarFields {
    ts: MarketTimestamp,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

impl TryFrom<BarFields> for Bar {
    type Error = ValidationError;

    fn try_from(fields: BarFields) -> Result<Self, Self::Error> {
        Self::new(
            fields.ts,
            fields.open,
            fields.high,
            fields.low,
            fields.close,
            fields.volume,
        )
    }
}

/// Canonical time series for one query: strictly increasing timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    key: QueryKey,
    bars: Vec<Bar>,
}

impl Series {
    /// Sort bars chronologically and drop repeated timestamps, keeping the first.
    pub fn new(key: QueryKey, mut bars: Vec<Bar>) -> Self {
        // stable sort keeps provider order among duplicates
        bars.sort_by_key(|bar| bar.ts);
        bars.dedup_by_key(|bar| bar.ts);
        Self { key, bars }
    }

    pub fn empty(key: QueryKey) -> Self {
        Self {
            key,
            bars: Vec::new(),
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|bar| bar.close)
    }
}

/// Best-effort latest price lookup. `price == None` means unknown, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub ticker: Ticker,
    pub price: Option<f64>,
    pub currency: String,
}

impl Quote {
    pub fn new(ticker: Ticker, price: Option<f64>, currency: Option<&str>) -> Self {
        let price = price.filter(|value| value.is_finite() && *value >= 0.0);
        let currency = currency
            .and_then(|code| validate_currency_code(code).ok())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned());

        Self {
            ticker,
            price,
            currency,
        }
    }

    pub fn unknown(ticker: Ticker) -> Self {
        Self::new(ticker, None, None)
    }
}

/// Bars of one series grouped by exchange-local calendar date.
///
/// Buckets are never empty and iterate in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct IntradayPartition {
    days: BTreeMap<Date, Vec<Bar>>,
}

impl IntradayPartition {
    pub(crate) fn from_days(days: BTreeMap<Date, Vec<Bar>>) -> Self {
        debug_assert!(days.values().all(|bars| !bars.is_empty()));
        Self { days }
    }

    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.days.keys().copied()
    }

    pub fn day(&self, date: Date) -> Option<&[Bar]> {
        self.days.get(&date).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Date, &[Bar])> + '_ {
        self.days.iter().map(|(date, bars)| (*date, bars.as_slice()))
    }

    pub fn first_date(&self) -> Option<Date> {
        self.days.keys().next().copied()
    }

    /// Number of distinct trading dates.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Validate and normalize currency to uppercase 3-letter code.
pub fn validate_currency_code(input: &str) -> Result<String, ValidationError> {
    let normalized = input.trim().to_ascii_uppercase();
    let is_valid = normalized.len() == 3 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());

    if !is_valid {
        return Err(ValidationError::InvalidCurrency {
            value: input.to_owned(),
        });
    }

    Ok(normalized)
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
