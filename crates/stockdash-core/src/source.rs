//! Market-data source contract.
//!
//! A [`MarketDataSource`] is the only component that talks to the outside
//! world. It answers two questions:
//!
//! | Method | Returns | Notes |
//! |--------|---------|-------|
//! | [`historical_bars`](MarketDataSource::historical_bars) | `Vec<Bar>` | empty when the window has no rows |
//! | [`last_quote`](MarketDataSource::last_quote) | [`QuoteSnapshot`] | fields may be missing |
//!
//! Sources make a single attempt per call; retry and caching live elsewhere.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{Bar, QueryKey, Ticker};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceErrorKind {
    Unavailable,
    InvalidRequest,
    Internal,
}

/// Structured provider or transport failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Raw latest-price fields as reported by a provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub price: Option<f64>,
    pub currency: Option<String>,
}

/// Source adapter contract.
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// page through [`DataAccess`](crate::DataAccess).
pub trait MarketDataSource: Send + Sync {
    /// Short provider name used in logs and output metadata.
    fn name(&self) -> &'static str;

    /// Fetch bars for the exact (ticker, period, interval) window.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the provider cannot be reached or answers
    /// with something other than data or a recognizable "no data" reply.
    fn historical_bars<'a>(
        &'a self,
        key: &'a QueryKey,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Bar>, SourceError>> + Send + 'a>>;

    /// Fetch the latest known price and its currency.
    fn last_quote<'a>(
        &'a self,
        ticker: &'a Ticker,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteSnapshot, SourceError>> + Send + 'a>>;
}
