//! Upstream weather provider interface and the weather fetcher
//!
//! `WeatherProvider` describes the operations the lookup pipeline needs from
//! the upstream service; `openweather` implements them over HTTP.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::Result;
use crate::models::{CurrentConditions, RawForecastInterval};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Number of candidates requested from free-text geocoding
pub const GEOCODE_LIMIT: u8 = 5;

/// A single free-text geocoding match
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    pub name: String,
    pub state: Option<String>,
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// Result of postal-code geocoding
#[derive(Debug, Clone, PartialEq)]
pub struct PostalMatch {
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Free-text geocoding, up to `limit` matches in provider order
    async fn geocode_by_name(&self, query: &str, limit: u8) -> Result<Vec<GeocodeMatch>>;

    /// Postal-code geocoding; `None` when the provider knows no such code
    async fn geocode_by_postal_code(&self, code: &str) -> Result<Option<PostalMatch>>;

    /// Current conditions for coordinates, metric units
    async fn current_conditions(&self, lat: f64, lon: f64) -> Result<CurrentConditions>;

    /// Current conditions looked up directly by postal code
    async fn current_conditions_by_postal_code(&self, code: &str) -> Result<CurrentConditions>;

    /// Raw 3-hourly forecast for coordinates, metric units
    async fn forecast(&self, lat: f64, lon: f64) -> Result<Vec<RawForecastInterval>>;
}

/// Fetch current conditions and raw forecast for the same coordinates.
///
/// Both calls are issued concurrently; the first failure wins.
#[instrument(skip(provider))]
pub async fn fetch_weather(
    provider: &dyn WeatherProvider,
    lat: f64,
    lon: f64,
) -> Result<(CurrentConditions, Vec<RawForecastInterval>)> {
    let (current, intervals) =
        futures::try_join!(provider.current_conditions(lat, lon), provider.forecast(lat, lon))?;
    debug!("Fetched current conditions and {} forecast intervals", intervals.len());
    Ok((current, intervals))
}
