//! Weather lookup pipeline
//!
//! resolve -> fetch -> aggregate, composed into a [`WeatherSnapshot`].

use std::sync::Arc;

use tracing::{info, instrument};

use crate::Result;
use crate::aggregator::aggregate_daily;
use crate::location_resolver::{LocationResolver, Resolution};
use crate::models::WeatherSnapshot;
use crate::weather::{WeatherProvider, fetch_weather};

/// Service answering weather queries for free-form location input
#[derive(Clone)]
pub struct WeatherLookupService {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherLookupService {
    #[must_use]
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Resolve `input` and return current conditions plus a daily forecast.
    ///
    /// Fails with `InvalidInput` for blank input, `LocationNotFound` when no
    /// strategy resolves the location, and `Upstream` for provider failures
    /// outside the fallback chain.
    #[instrument(skip(self))]
    pub async fn resolve_weather(&self, input: &str) -> Result<WeatherSnapshot> {
        let provider = self.provider.as_ref();
        let Resolution {
            mut location,
            current,
            candidates,
        } = LocationResolver::new(provider).resolve(input).await?;

        let (current, intervals) = match current {
            Some(current) => {
                let intervals = provider.forecast(location.lat, location.lon).await?;
                (current, intervals)
            }
            None => fetch_weather(provider, location.lat, location.lon).await?,
        };

        if location.name.is_empty() {
            let echoed = current.display_name();
            location.name = if echoed.is_empty() {
                location.format_coordinates()
            } else {
                echoed
            };
        }

        let forecast = aggregate_daily(&intervals);
        info!(
            "Weather for '{}' at ({:.4}, {:.4}): {} forecast days",
            location.name,
            location.lat,
            location.lon,
            forecast.len()
        );

        Ok(WeatherSnapshot {
            location,
            current,
            forecast,
            candidates,
        })
    }
}
