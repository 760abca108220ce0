//! OpenWeatherMap client
//!
//! Implements [`WeatherProvider`] against the OpenWeatherMap geocoding,
//! current weather and 5 day / 3 hour forecast endpoints. Requests are made
//! once; failures surface as upstream errors and are never retried here.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use super::{GeocodeMatch, PostalMatch, WeatherProvider};
use crate::config::ProviderConfig;
use crate::models::{CurrentConditions, RawForecastInterval};
use crate::{Result, WeatherDeskError};

const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// Temperatures throughout the crate are Celsius
const UNITS: &str = "metric";

/// HTTP client for the OpenWeatherMap API
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    /// Create a new client from provider settings
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                WeatherDeskError::config(
                    "OpenWeatherMap API key missing. Set WEATHERDESK_PROVIDER__API_KEY or OPENWEATHER_API_KEY.",
                )
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("WeatherDesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WeatherDeskError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}{}?", self.base_url, path);
        for (key, value) in params {
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
            url.push('&');
        }
        // appid last so log lines can cut it off
        url.push_str("appid=");
        url.push_str(&urlencoding::encode(&self.api_key));
        url
    }

    #[instrument(skip(self, url), fields(url = %redact(url)))]
    async fn send(&self, url: &str) -> Result<Response> {
        let start = Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Network error calling OpenWeatherMap: {}", e);
            WeatherDeskError::upstream(format!("Network error: {e}"))
        })?;

        let elapsed = start.elapsed();
        debug!(
            "HTTP response received: {} in {:.3}s",
            response.status(),
            elapsed.as_secs_f64()
        );
        if elapsed > SLOW_RESPONSE {
            warn!("Slow API response detected: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let response = self.send(url).await?;
        let status = response.status();

        if !status.is_success() {
            error!("OpenWeatherMap {} request failed with status {}", what, status);
            return Err(WeatherDeskError::upstream(format!(
                "{} request failed with status: {} - {}",
                what,
                status,
                status.canonical_reason().unwrap_or("Unknown error")
            )));
        }

        response.json::<T>().await.map_err(|e| {
            error!("Failed to parse {} response: {}", what, e);
            WeatherDeskError::upstream(format!("Invalid {what} data received from OpenWeatherMap"))
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn geocode_by_name(&self, query: &str, limit: u8) -> Result<Vec<GeocodeMatch>> {
        info!("Geocoding location: '{}'", query);
        let url = self.url(
            "/geo/1.0/direct",
            &[("q", query.to_string()), ("limit", limit.to_string())],
        );

        let entries: Vec<DirectGeocodeEntry> = self.get_json(&url, "geocoding").await?;
        if entries.is_empty() {
            warn!("No results found for location '{}'", query);
        } else {
            info!("Found {} geocoding results for '{}'", entries.len(), query);
        }

        Ok(entries.into_iter().map(GeocodeMatch::from).collect())
    }

    #[instrument(skip(self))]
    async fn geocode_by_postal_code(&self, code: &str) -> Result<Option<PostalMatch>> {
        let url = self.url("/geo/1.0/zip", &[("zip", code.to_string())]);
        let response = self.send(&url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Postal code {} unknown to zip geocoding", code);
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(WeatherDeskError::upstream(format!(
                "zip geocoding request failed with status: {}",
                response.status()
            )));
        }

        let entry: ZipGeocodeResponse = response.json().await.map_err(|e| {
            WeatherDeskError::upstream(format!("Invalid zip geocoding data: {e}"))
        })?;

        Ok(Some(PostalMatch {
            name: entry.name.filter(|name| !name.is_empty()),
            lat: entry.lat,
            lon: entry.lon,
        }))
    }

    #[instrument(skip(self))]
    async fn current_conditions(&self, lat: f64, lon: f64) -> Result<CurrentConditions> {
        let url = self.url(
            "/data/2.5/weather",
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("units", UNITS.to_string()),
            ],
        );
        self.get_json(&url, "current weather").await
    }

    #[instrument(skip(self))]
    async fn current_conditions_by_postal_code(&self, code: &str) -> Result<CurrentConditions> {
        let url = self.url(
            "/data/2.5/weather",
            &[("zip", code.to_string()), ("units", UNITS.to_string())],
        );
        self.get_json(&url, "current weather").await
    }

    #[instrument(skip(self))]
    async fn forecast(&self, lat: f64, lon: f64) -> Result<Vec<RawForecastInterval>> {
        let url = self.url(
            "/data/2.5/forecast",
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("units", UNITS.to_string()),
            ],
        );

        let response: ForecastResponse = self.get_json(&url, "forecast").await?;
        info!("Retrieved forecast with {} data points", response.list.len());

        Ok(response
            .list
            .into_iter()
            .map(RawForecastInterval::from)
            .collect())
    }
}

fn redact(url: &str) -> &str {
    url.split("appid=").next().unwrap_or(url)
}

/// Entry of `/geo/1.0/direct`
#[derive(Debug, Deserialize)]
struct DirectGeocodeEntry {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

impl From<DirectGeocodeEntry> for GeocodeMatch {
    fn from(entry: DirectGeocodeEntry) -> Self {
        Self {
            name: entry.name,
            state: entry.state,
            country: entry.country,
            lat: entry.lat,
            lon: entry.lon,
        }
    }
}

/// Body of `/geo/1.0/zip`
#[derive(Debug, Deserialize)]
struct ZipGeocodeResponse {
    name: Option<String>,
    lat: f64,
    lon: f64,
}

/// Body of `/data/2.5/forecast`
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt_txt: String,
    main: ForecastMain,
    #[serde(default)]
    weather: Vec<ForecastCondition>,
}

#[derive(Debug, Deserialize)]
struct ForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastCondition {
    icon: Option<String>,
    description: Option<String>,
}

impl From<ForecastEntry> for RawForecastInterval {
    fn from(entry: ForecastEntry) -> Self {
        let condition = entry.weather.into_iter().next();
        let (icon, description) = match condition {
            Some(condition) => (condition.icon, condition.description),
            None => (None, None),
        };

        Self {
            timestamp: entry.dt_txt,
            temperature: entry.main.temp,
            icon,
            description,
        }
    }
}
