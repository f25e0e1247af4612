use serde::Serialize;

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct Page {
    name: &'static str,
    description: &'static str,
}

#[derive(Debug, Serialize)]
struct OverviewData {
    title: &'static str,
    pages: Vec<Page>,
}

const PAGES: [Page; 5] = [
    Page {
        name: "candlestick",
        description: "Daily, weekly or monthly candlesticks with a volume panel underneath.",
    },
    Page {
        name: "chart",
        description: "Close prices with optional simple moving-average overlays.",
    },
    Page {
        name: "intraday",
        description: "5-minute candlesticks for one trading day of a recent window.",
    },
    Page {
        name: "stats",
        description: "Count, mean, standard deviation, min, quartiles and max of every OHLCV column.",
    },
    Page {
        name: "quote",
        description: "Latest traded price and its currency, when the provider knows it.",
    },
];

pub fn run() -> Result<CommandResult, CliError> {
    let data = serde_json::to_value(OverviewData {
        title: "Stock Dashboard",
        pages: PAGES.into_iter().collect(),
    })?;
    Ok(CommandResult::ok(data))
}
