//! Market-data provider adapters.

pub mod yahoo;

pub use yahoo::{YahooSource, YAHOO_BASE_URL};
