//! Serializable chart payloads for an external renderer.
//!
//! A payload is display options plus traces. The renderer only draws; every
//! value it needs is already computed here.

use serde::Serialize;
use time::Date;

use crate::transform::{moving_average, MovingAveragePoint};
use crate::{Bar, DataError, IntradayPartition, MarketTimestamp, Series};

/// Increasing/decreasing color pair for candlesticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandleColors {
    pub increasing_line: String,
    pub decreasing_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub increasing_fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decreasing_fill: Option<String>,
}

impl CandleColors {
    /// Daily candlestick palette.
    pub fn daily() -> Self {
        Self {
            increasing_line: String::from("#03631B"),
            decreasing_line: String::from("#930301"),
            increasing_fill: None,
            decreasing_fill: None,
        }
    }

    /// Intraday palette with lighter body fills.
    pub fn intraday() -> Self {
        Self {
            increasing_line: String::from("#017b1b"),
            decreasing_line: String::from("#97011f"),
            increasing_fill: Some(String::from("#1de9b6")),
            decreasing_fill: Some(String::from("#ff8a80")),
        }
    }
}

/// Layout-level display options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub height: u32,
    /// Axes cannot be panned or zoomed.
    pub fixed_range: bool,
    pub show_legend: bool,
    pub range_slider: bool,
    /// Relative heights of vertically stacked panels sharing the x axis.
    pub panel_heights: Vec<f64>,
}

impl ChartOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_axis_title: String::from("Date"),
            y_axis_title: String::from("Price"),
            height: 500,
            fixed_range: true,
            show_legend: false,
            range_slider: false,
            panel_heights: vec![1.0],
        }
    }

    pub fn with_axes(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_axis_title = x.into();
        self.y_axis_title = y.into();
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn with_legend(mut self, show_legend: bool) -> Self {
        self.show_legend = show_legend;
        self
    }

    pub fn with_panels(mut self, panel_heights: Vec<f64>) -> Self {
        self.panel_heights = panel_heights;
        self
    }
}

/// One value of a line trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinePoint {
    pub ts: MarketTimestamp,
    pub value: Option<f64>,
}

impl From<MovingAveragePoint> for LinePoint {
    fn from(point: MovingAveragePoint) -> Self {
        Self {
            ts: point.ts,
            value: point.value,
        }
    }
}

/// One bar of a volume trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumePoint {
    pub ts: MarketTimestamp,
    pub volume: u64,
}

/// Drawable element bound to a panel (0 is the top panel).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trace {
    Line {
        name: String,
        panel: usize,
        points: Vec<LinePoint>,
    },
    Candlestick {
        name: String,
        panel: usize,
        bars: Vec<Bar>,
        colors: CandleColors,
    },
    Volume {
        name: String,
        panel: usize,
        points: Vec<VolumePoint>,
        color: String,
        opacity: f64,
    },
}

/// Options plus traces, ready to hand to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub options: ChartOptions,
    pub traces: Vec<Trace>,
}

/// Close prices over time.
pub fn line_chart(series: &Series) -> ChartPayload {
    ChartPayload {
        options: ChartOptions::new(format!("{} Close", series.key().ticker())),
        traces: vec![close_trace(series)],
    }
}

/// Close prices with one simple-moving-average overlay per window.
pub fn moving_average_chart(series: &Series, windows: &[usize]) -> Result<ChartPayload, DataError> {
    let mut traces = vec![close_trace(series)];
    for &window in windows {
        let points = moving_average(series, window)?;
        traces.push(Trace::Line {
            name: format!("SMA {window}"),
            panel: 0,
            points: points.into_iter().map(LinePoint::from).collect(),
        });
    }

    Ok(ChartPayload {
        options: ChartOptions::new(format!("{} Moving Averages", series.key().ticker()))
            .with_legend(!windows.is_empty()),
        traces,
    })
}

/// Candlesticks over a 70/30 split with a volume panel underneath.
pub fn candlestick_with_volume(series: &Series, currency: &str) -> ChartPayload {
    let volume = series
        .bars()
        .iter()
        .map(|bar| VolumePoint {
            ts: bar.ts,
            volume: bar.volume,
        })
        .collect();

    ChartPayload {
        options: ChartOptions::new(format!("{} Candlestick Chart", series.key().ticker()))
            .with_axes("Date", format!("Price ({currency})"))
            .with_height(600)
            .with_panels(vec![0.7, 0.3]),
        traces: vec![
            Trace::Candlestick {
                name: String::from("Candlestick"),
                panel: 0,
                bars: series.bars().to_vec(),
                colors: CandleColors::daily(),
            },
            Trace::Volume {
                name: String::from("Volume"),
                panel: 1,
                points: volume,
                color: String::from("#009c8f"),
                opacity: 0.5,
            },
        ],
    }
}

/// Candlesticks for a single trading date; `None` if the date has no bars.
pub fn intraday_candlestick(partition: &IntradayPartition, date: Date) -> Option<ChartPayload> {
    let bars = partition.day(date)?;
    Some(ChartPayload {
        options: ChartOptions::new("Intraday Candlestick Chart").with_axes("Time", "Price"),
        traces: vec![Trace::Candlestick {
            name: String::from("Intraday Candlestick"),
            panel: 0,
            bars: bars.to_vec(),
            colors: CandleColors::intraday(),
        }],
    })
}

fn close_trace(series: &Series) -> Trace {
    Trace::Line {
        name: String::from("Close"),
        panel: 0,
        points: series
            .bars()
            .iter()
            .map(|bar| LinePoint {
                ts: bar.ts,
                value: Some(bar.close),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::partition_by_day;
    use crate::{Interval, Period, QueryKey};

    fn series(count: usize) -> Series {
        let key = QueryKey::parse("MSFT", Period::FiveDays, Interval::OneHour).expect("valid key");
        let bars = (0..count)
            .map(|i| {
                let ts = MarketTimestamp::from_unix(1_709_908_200 + i as i64 * 3_600, -18_000)
                    .expect("timestamp");
                Bar::new(ts, 10.0, 11.0, 9.0, 10.0 + i as f64, 1_000).expect("bar")
            })
            .collect();
        Series::new(key, bars)
    }

    #[test]
    fn candlestick_layout_splits_price_and_volume() {
        let payload = candlestick_with_volume(&series(3), "USD");

        assert_eq!(payload.options.title, "MSFT Candlestick Chart");
        assert_eq!(payload.options.y_axis_title, "Price (USD)");
        assert_eq!(payload.options.panel_heights, vec![0.7, 0.3]);
        assert!(payload.options.fixed_range);
        assert!(matches!(&payload.traces[1], Trace::Volume { panel: 1, points, .. } if points.len() == 3));
    }

    #[test]
    fn moving_average_chart_adds_one_overlay_per_window() {
        let payload = moving_average_chart(&series(6), &[2, 3]).expect("valid windows");
        assert_eq!(payload.traces.len(), 3);
        assert!(payload.options.show_legend);

        let Trace::Line { name, points, .. } = &payload.traces[2] else {
            panic!("expected a line trace");
        };
        assert_eq!(name, "SMA 3");
        assert_eq!(points[1].value, None);
        assert_eq!(points[2].value, Some(11.0));
    }

    #[test]
    fn moving_average_chart_propagates_invalid_window() {
        let error = moving_average_chart(&series(3), &[1]).expect_err("must fail");
        assert_eq!(error, DataError::InvalidWindow { window: 1 });
    }

    #[test]
    fn intraday_chart_uses_fill_palette() {
        let series = series(4);
        let partition = partition_by_day(&series);
        let date = partition.first_date().expect("one day");

        let payload = intraday_candlestick(&partition, date).expect("date has bars");
        let json = serde_json::to_value(&payload).expect("json");
        assert_eq!(json["traces"][0]["kind"], "candlestick");
        assert_eq!(json["traces"][0]["colors"]["increasing_fill"], "#1de9b6");
        assert_eq!(json["options"]["x_axis_title"], "Time");
    }

    #[test]
    fn intraday_chart_for_missing_date_is_none() {
        let partition = partition_by_day(&series(2));
        let other = Date::from_calendar_date(2000, time::Month::January, 3).expect("date");
        assert!(intraday_candlestick(&partition, other).is_none());
    }
}
