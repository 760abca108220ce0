//! `WeatherDesk` - weather lookup and record keeping
//!
//! Resolves free-form location input (coordinates, postal codes, place names)
//! against OpenWeatherMap, aggregates the 3-hourly forecast into daily
//! summaries, and keeps user-saved snapshots and lookup history in an
//! embedded store.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod location_resolver;
pub mod lookup;
pub mod models;
pub mod store;
pub mod telemetry;
pub mod weather;
pub mod web;

#[cfg(test)]
mod test_support;

// Re-export core types for public API
pub use aggregator::aggregate_daily;
pub use config::WeatherDeskConfig;
pub use error::{ErrorCode, WeatherDeskError};
pub use location_resolver::{LocationInput, LocationParser, LocationResolver};
pub use lookup::WeatherLookupService;
pub use models::{DailyForecast, RawForecastInterval, ResolvedLocation, WeatherSnapshot};
pub use store::RecordStore;
pub use weather::{OpenWeatherClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherDeskError>;
