use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::ValidationError;

/// Bar timestamp in the exchange-local offset supplied by the provider.
///
/// Ordering and equality compare the underlying instant, so two timestamps
/// for the same moment are equal regardless of offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarketTimestamp(OffsetDateTime);

impl MarketTimestamp {
    pub fn now_utc() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        OffsetDateTime::parse(input, &Rfc3339)
            .map(Self)
            .map_err(|_| ValidationError::InvalidTimestamp {
                value: input.to_owned(),
            })
    }

    /// Build a timestamp from UNIX seconds shifted into `offset_seconds` east of UTC.
    pub fn from_unix(seconds: i64, offset_seconds: i64) -> Result<Self, ValidationError> {
        let offset = i32::try_from(offset_seconds)
            .ok()
            .and_then(|value| UtcOffset::from_whole_seconds(value).ok())
            .ok_or(ValidationError::InvalidOffset {
                seconds: offset_seconds,
            })?;
        let utc = OffsetDateTime::from_unix_timestamp(seconds).map_err(|_| {
            ValidationError::InvalidTimestamp {
                value: seconds.to_string(),
            }
        })?;

        Ok(Self(utc.to_offset(offset)))
    }

    /// Calendar date in the provider-local offset.
    pub fn local_date(self) -> Date {
        self.0.date()
    }

    pub fn unix_timestamp(self) -> i64 {
        self.0.unix_timestamp()
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.0.unix_timestamp().to_string())
    }
}

impl From<OffsetDateTime> for MarketTimestamp {
    fn from(value: OffsetDateTime) -> Self {
        Self(value)
    }
}

impl Display for MarketTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for MarketTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

impl<'de> Deserialize<'de> for MarketTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
