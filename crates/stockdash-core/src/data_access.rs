//! Validated, cached access to historical bars and quotes.
//!
//! ```text
//! (ticker, period, interval)
//!          │ validate: InvalidTicker / UnsupportedCombination
//!          ▼
//!      QueryKey ──► SeriesCache ── hit ──► Arc<Series>
//!          │ miss
//!          ▼
//!   MarketDataSource::historical_bars ──► Series::new ──► cache.put
//! ```

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::adapters::YahooSource;
use crate::cache::SeriesCache;
use crate::config::DataAccessConfig;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::source::{MarketDataSource, SourceError};
use crate::{Bar, DataError, Interval, Period, QueryKey, Quote, Series, Ticker};

/// Outcome of a fetch, with whether the cache served it.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub series: Arc<Series>,
    pub cache_hit: bool,
}

/// Single entry point pages use to obtain series and quotes.
#[derive(Clone)]
pub struct DataAccess {
    source: Arc<dyn MarketDataSource>,
    cache: SeriesCache,
    config: DataAccessConfig,
}

impl DataAccess {
    pub fn new(source: Arc<dyn MarketDataSource>, config: DataAccessConfig) -> Self {
        Self {
            source,
            cache: SeriesCache::new(config.cache_ttl),
            config,
        }
    }

    /// Yahoo-backed access over the given transport.
    pub fn yahoo(http_client: Arc<dyn HttpClient>, config: DataAccessConfig) -> Self {
        let source = YahooSource::new(http_client)
            .with_base_url(config.base_url.clone())
            .with_timeout_ms(config.request_timeout_ms);
        Self::new(Arc::new(source), config)
    }

    /// Yahoo-backed access over a reqwest transport.
    pub fn from_config(config: DataAccessConfig) -> Self {
        Self::yahoo(Arc::new(ReqwestHttpClient::default()), config)
    }

    pub fn config(&self) -> &DataAccessConfig {
        &self.config
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Validate parameters and return the (possibly cached) series.
    ///
    /// An empty series is a successful answer: the provider had no rows for
    /// the window.
    pub async fn fetch(
        &self,
        ticker: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Arc<Series>, DataError> {
        let key = QueryKey::parse(ticker, period, interval)?;
        self.fetch_key(&key).await
    }

    pub async fn fetch_key(&self, key: &QueryKey) -> Result<Arc<Series>, DataError> {
        self.fetch_with_status(key).await.map(|fetched| fetched.series)
    }

    /// Like [`fetch_key`](Self::fetch_key) but also reports whether the cache answered.
    pub async fn fetch_with_status(&self, key: &QueryKey) -> Result<Fetched, DataError> {
        if let Some(series) = self.cache.get(key).await {
            debug!(%key, bars = series.len(), "series cache hit");
            return Ok(Fetched {
                series,
                cache_hit: true,
            });
        }

        debug!(%key, "series cache miss");
        let started = Instant::now();
        let bars = self.load_bars(key).await.map_err(|error| {
            warn!(%key, code = error.code(), "provider fetch failed: {}", error.message());
            DataError::DataUnavailable(error)
        })?;

        let series = Arc::new(Series::new(key.clone(), bars));
        info!(
            %key,
            source = self.source.name(),
            bars = series.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetched series"
        );

        self.cache.put(key.clone(), Arc::clone(&series)).await;
        Ok(Fetched {
            series,
            cache_hit: false,
        })
    }

    async fn load_bars(&self, key: &QueryKey) -> Result<Vec<Bar>, SourceError> {
        let call = self.source.historical_bars(key);
        match self.config.fetch_timeout {
            Some(deadline) => tokio::time::timeout(deadline, call).await.map_err(|_| {
                SourceError::unavailable(format!(
                    "{} did not answer within {} ms",
                    self.source.name(),
                    deadline.as_millis()
                ))
            })?,
            None => call.await,
        }
    }

    /// Best-effort latest price. Failures yield a quote with `price == None`.
    pub async fn get_quote(&self, ticker: &Ticker) -> Quote {
        match self.source.last_quote(ticker).await {
            Ok(snapshot) => {
                if snapshot.price.is_none() {
                    debug!(%ticker, "provider returned no last price");
                }
                Quote::new(ticker.clone(), snapshot.price, snapshot.currency.as_deref())
            }
            Err(error) => {
                warn!(%ticker, code = error.code(), "quote lookup failed: {}", error.message());
                Quote::unknown(ticker.clone())
            }
        }
    }

    /// Evict one key so the next fetch goes to the provider.
    pub async fn invalidate(&self, key: &QueryKey) -> bool {
        let removed = self.cache.invalidate(key).await;
        debug!(%key, removed, "invalidated series");
        removed
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// Number of cached entries, sweeping expired ones first.
    pub async fn cached_entries(&self) -> usize {
        self.cache.clear_expired().await;
        self.cache.len().await
    }
}
