//! Pure transforms over a [`Series`].
//!
//! None of these functions touch the network or the cache; they depend only
//! on the shape [`DataAccess`](crate::DataAccess) produces.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::{Bar, DataError, IntradayPartition, MarketTimestamp, Series};

/// Moving-average value at one bar; `None` until a full window is available.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MovingAveragePoint {
    pub ts: MarketTimestamp,
    pub value: Option<f64>,
}

/// Simple moving average of close prices.
///
/// The output has one point per bar. The first `window - 1` points are
/// `None`; point `i` is the mean of closes `[i + 1 - window, i]`. Partial
/// windows are never averaged.
pub fn moving_average(series: &Series, window: usize) -> Result<Vec<MovingAveragePoint>, DataError> {
    if window < 2 {
        return Err(DataError::InvalidWindow { window });
    }

    let closes = series.closes().collect::<Vec<_>>();
    let warmup = (window - 1).min(closes.len());
    let divisor = window as f64;

    let values = std::iter::repeat(None)
        .take(warmup)
        .chain(
            closes
                .windows(window)
                .map(|slice| Some(slice.iter().sum::<f64>() / divisor)),
        );

    Ok(series
        .bars()
        .iter()
        .zip(values)
        .map(|(bar, value)| MovingAveragePoint { ts: bar.ts, value })
        .collect())
}

/// Group bars by their exchange-local calendar date.
pub fn partition_by_day(series: &Series) -> IntradayPartition {
    let mut days: BTreeMap<_, Vec<Bar>> = BTreeMap::new();
    for bar in series.bars() {
        days.entry(bar.ts.local_date()).or_default().push(bar.clone());
    }
    IntradayPartition::from_days(days)
}

/// Column of a series that [`describe`] summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl SeriesField {
    pub const ALL: [Self; 5] = [Self::Open, Self::High, Self::Low, Self::Close, Self::Volume];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
        }
    }

    fn value(self, bar: &Bar) -> f64 {
        match self {
            Self::Open => bar.open,
            Self::High => bar.high,
            Self::Low => bar.low,
            Self::Close => bar.close,
            Self::Volume => bar.volume as f64,
        }
    }
}

impl Display for SeriesField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive statistics of one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two observations.
    pub std: Option<f64>,
    pub min: f64,
    #[serde(rename = "25%")]
    pub p25: f64,
    #[serde(rename = "50%")]
    pub p50: f64,
    #[serde(rename = "75%")]
    pub p75: f64,
    pub max: f64,
}

impl FieldSummary {
    fn from_values(mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        let count = values.len();
        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = (count > 1).then(|| {
            let squares = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            (squares / (n - 1.0)).sqrt()
        });

        Self {
            count,
            mean,
            std,
            min: values[0],
            p25: quantile(&values, 0.25),
            p50: quantile(&values, 0.50),
            p75: quantile(&values, 0.75),
            max: values[count - 1],
        }
    }
}

/// Per-field summary table for a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SeriesDescription {
    fields: BTreeMap<SeriesField, FieldSummary>,
}

impl SeriesDescription {
    pub fn get(&self, field: SeriesField) -> Option<&FieldSummary> {
        self.fields.get(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SeriesField, &FieldSummary)> + '_ {
        self.fields.iter().map(|(field, summary)| (*field, summary))
    }
}

/// Count, mean, std, min, quartiles and max of every OHLCV field.
///
/// Fails with [`DataError::EmptySeries`] when there are no bars.
pub fn describe(series: &Series) -> Result<SeriesDescription, DataError> {
    if series.is_empty() {
        return Err(DataError::EmptySeries);
    }

    let fields = SeriesField::ALL
        .into_iter()
        .map(|field| {
            let values = series.bars().iter().map(|bar| field.value(bar)).collect();
            (field, FieldSummary::from_values(values))
        })
        .collect();

    Ok(SeriesDescription { fields })
}

/// Linear interpolation between closest ranks over sorted, non-empty `values`.
fn quantile(values: &[f64], q: f64) -> f64 {
    let position = q * (values.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    values[lower] + (values[upper] - values[lower]) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Interval, Period, QueryKey};

    fn series_from(closes: &[f64]) -> Series {
        let key = QueryKey::parse("MSFT", Period::OneMonth, Interval::OneDay).expect("valid key");
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let ts = MarketTimestamp::from_unix(1_700_000_000 + i as i64 * 86_400, 0)
                    .expect("timestamp");
                Bar::new(ts, close, close + 1.0, close - 1.0, close, (i as u64 + 1) * 100)
                    .expect("bar")
            })
            .collect();
        Series::new(key, bars)
    }

    #[test]
    fn moving_average_pads_warmup_with_none() {
        let series = series_from(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let values = moving_average(&series, 3)
            .expect("valid window")
            .into_iter()
            .map(|point| point.value)
            .collect::<Vec<_>>();

        assert_eq!(values, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn moving_average_keeps_timestamps() {
        let series = series_from(&[1.0, 2.0, 3.0]);
        let points = moving_average(&series, 2).expect("valid window");
        for (point, bar) in points.iter().zip(series.bars()) {
            assert_eq!(point.ts, bar.ts);
        }
    }

    #[test]
    fn moving_average_shorter_than_window_is_all_none() {
        let series = series_from(&[1.0, 2.0]);
        let points = moving_average(&series, 5).expect("valid window");
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|point| point.value.is_none()));
    }

    #[test]
    fn moving_average_rejects_small_windows() {
        let series = series_from(&[1.0, 2.0]);
        assert_eq!(
            moving_average(&series, 1).expect_err("must fail"),
            DataError::InvalidWindow { window: 1 }
        );
        assert!(moving_average(&series, 0).is_err());
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.25), 1.75);
        assert_eq!(quantile(&values, 0.50), 2.5);
        assert_eq!(quantile(&values, 0.75), 3.25);
    }

    #[test]
    fn describe_matches_hand_computed_close_column() {
        let series = series_from(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let description = describe(&series).expect("non-empty");
        let close = description.get(SeriesField::Close).expect("close column");

        assert_eq!(close.count, 8);
        assert_eq!(close.mean, 5.0);
        let std = close.std.expect("sample std");
        assert!((std - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(close.min, 2.0);
        assert_eq!(close.p25, 4.0);
        assert_eq!(close.p50, 4.5);
        assert_eq!(close.p75, 5.5);
        assert_eq!(close.max, 9.0);
    }

    #[test]
    fn describe_covers_volume_as_float() {
        let series = series_from(&[1.0, 1.0, 1.0]);
        let description = describe(&series).expect("non-empty");
        let volume = description.get(SeriesField::Volume).expect("volume column");
        assert_eq!(volume.mean, 200.0);
        assert_eq!(volume.max, 300.0);
    }

    #[test]
    fn describe_serializes_with_percent_labels() {
        let series = series_from(&[1.0]);
        let json = serde_json::to_value(describe(&series).expect("non-empty")).expect("json");
        assert_eq!(json["close"]["50%"], 1.0);
        assert!(json["open"]["std"].is_null());
        assert_eq!(
            json.as_object().expect("object").keys().collect::<Vec<_>>(),
            vec!["close", "high", "low", "open", "volume"]
        );
    }
}
