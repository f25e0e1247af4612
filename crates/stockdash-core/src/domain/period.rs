use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Total lookback window requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "15d")]
    FifteenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    pub const ALL: [Self; 14] = [
        Self::OneDay,
        Self::FiveDays,
        Self::SevenDays,
        Self::FifteenDays,
        Self::ThirtyDays,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::FiveYears,
        Self::TenYears,
        Self::YearToDate,
        Self::Max,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::SevenDays => "7d",
            Self::FifteenDays => "15d",
            Self::ThirtyDays => "30d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::TenYears => "10y",
            Self::YearToDate => "ytd",
            Self::Max => "max",
        }
    }

    /// Upper bound of calendar days covered by this window; `None` for `max`.
    ///
    /// Month and year windows use their longest possible length, so a
    /// combination check against a provider limit never under-counts.
    pub const fn lookback_days(self) -> Option<u32> {
        match self {
            Self::OneDay => Some(1),
            Self::FiveDays => Some(5),
            Self::SevenDays => Some(7),
            Self::FifteenDays => Some(15),
            Self::ThirtyDays => Some(30),
            Self::OneMonth => Some(31),
            Self::ThreeMonths => Some(92),
            Self::SixMonths => Some(184),
            Self::OneYear => Some(366),
            Self::TwoYears => Some(731),
            Self::FiveYears => Some(1_827),
            Self::TenYears => Some(3_653),
            Self::YearToDate => Some(366),
            Self::Max => None,
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|period| period.as_str() == normalized)
            .ok_or(ValidationError::InvalidPeriod { value: normalized })
    }
}
