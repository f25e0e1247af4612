//! Runtime settings for [`DataAccess`](crate::DataAccess).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::adapters::YAHOO_BASE_URL;
use crate::cache::DEFAULT_CACHE_TTL;
use crate::http_client::DEFAULT_TIMEOUT_MS;

/// Data layer configuration.
///
/// | Field | Default | Meaning |
/// |-------|---------|---------|
/// | `cache_ttl` | 300 s | lifetime of a cached series; zero disables caching |
/// | `fetch_timeout` | none | overall deadline for one `fetch` on a cache miss |
/// | `request_timeout_ms` | 10 000 | per-HTTP-request timeout |
/// | `base_url` | Yahoo query host | provider endpoint root |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataAccessConfig {
    #[serde(with = "duration_secs")]
    pub cache_ttl: Duration,
    #[serde(with = "optional_duration_millis")]
    pub fetch_timeout: Option<Duration>,
    pub request_timeout_ms: u64,
    pub base_url: String,
}

impl Default for DataAccessConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            fetch_timeout: None,
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            base_url: String::from(YAHOO_BASE_URL),
        }
    }
}

impl DataAccessConfig {
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

mod optional_duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_some(&(duration.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(deserializer).map(|millis| millis.map(Duration::from_millis))
    }
}
