//! Stub provider shared by unit tests

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::models::{CurrentConditions, RawForecastInterval};
use crate::weather::{GeocodeMatch, PostalMatch, WeatherProvider};
use crate::{Result, WeatherDeskError};

/// Canned answer for one provider operation
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Fail,
}

impl<T: Clone> Reply<T> {
    fn get(&self, operation: &str) -> Result<T> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Fail => Err(WeatherDeskError::upstream(format!("{operation} stub failure"))),
        }
    }
}

/// Provider returning canned replies and recording every call in order
pub struct StubProvider {
    pub geocode: Reply<Vec<GeocodeMatch>>,
    pub zip_geocode: Reply<Option<PostalMatch>>,
    pub zip_current: Reply<CurrentConditions>,
    pub current: Reply<CurrentConditions>,
    pub forecast: Reply<Vec<RawForecastInterval>>,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl Default for StubProvider {
    fn default() -> Self {
        Self {
            geocode: Reply::Ok(Vec::new()),
            zip_geocode: Reply::Fail,
            zip_current: Reply::Fail,
            current: Reply::Ok(Self::current_at("Ahmednagar", 19.15, 74.78)),
            forecast: Reply::Ok(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl StubProvider {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Calls excluding the two weather fetches
    pub fn resolution_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| !call.starts_with("current_conditions:") && !call.starts_with("forecast:"))
            .collect()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    pub fn current_at(name: &str, lat: f64, lon: f64) -> CurrentConditions {
        serde_json::from_value(json!({
            "coord": { "lat": lat, "lon": lon },
            "main": { "temp": 24.6, "humidity": 52 },
            "weather": [{ "icon": "03d", "description": "scattered clouds" }],
            "sys": { "country": "IN" },
            "name": name
        }))
        .unwrap()
    }
}

pub fn geocode_match(
    name: &str,
    state: Option<&str>,
    country: Option<&str>,
    lat: f64,
    lon: f64,
) -> GeocodeMatch {
    GeocodeMatch {
        name: name.to_string(),
        state: state.map(str::to_string),
        country: country.map(str::to_string),
        lat,
        lon,
    }
}

/// Eight 3-hourly samples per day for `days` consecutive November days
pub fn forecast_days(days: u32) -> Vec<RawForecastInterval> {
    (1..=days)
        .flat_map(|day| {
            (0..8).map(move |slot| {
                RawForecastInterval::new(
                    format!("2025-11-{day:02} {:02}:00:00", slot * 3),
                    10.0 + f64::from(slot),
                    Some("01d"),
                    Some("clear sky"),
                )
            })
        })
        .collect()
}

#[async_trait]
impl WeatherProvider for StubProvider {
    async fn geocode_by_name(&self, query: &str, limit: u8) -> Result<Vec<GeocodeMatch>> {
        self.record(format!("geocode_by_name:{query}:{limit}"));
        self.geocode.get("geocode_by_name")
    }

    async fn geocode_by_postal_code(&self, code: &str) -> Result<Option<PostalMatch>> {
        self.record(format!("geocode_by_postal_code:{code}"));
        self.zip_geocode.get("geocode_by_postal_code")
    }

    async fn current_conditions(&self, lat: f64, lon: f64) -> Result<CurrentConditions> {
        self.record(format!("current_conditions:{lat},{lon}"));
        self.current.get("current_conditions")
    }

    async fn current_conditions_by_postal_code(&self, code: &str) -> Result<CurrentConditions> {
        self.record(format!("current_conditions_by_postal_code:{code}"));
        self.zip_current.get("current_conditions_by_postal_code")
    }

    async fn forecast(&self, lat: f64, lon: f64) -> Result<Vec<RawForecastInterval>> {
        self.record(format!("forecast:{lat},{lon}"));
        self.forecast.get("forecast")
    }
}
