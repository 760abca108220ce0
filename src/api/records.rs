//! Saved weather snapshots

use axum::extract::{Path, State};
use serde::Deserialize;
use tracing::info;

use super::{ApiJson, AppState, ApiResponse};
use crate::models::{CurrentConditions, ResolvedLocation, SavedForecastDay, SavedWeather};
use crate::{Result, WeatherDeskError};

/// Snapshot as posted back by the frontend; only a few fields are kept
#[derive(Debug, Default, Deserialize)]
pub struct SaveWeatherPayload {
    #[serde(default)]
    pub location: Option<LocationPayload>,
    #[serde(default)]
    pub current: Option<CurrentConditions>,
    #[serde(default)]
    pub forecast: Vec<SavedForecastDay>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

impl SaveWeatherPayload {
    /// Reduce to a [`SavedWeather`]; needs a location name and a current temperature
    pub fn into_record(self) -> Result<SavedWeather> {
        let invalid = || WeatherDeskError::invalid_input("Invalid weather data");

        let location = self.location.ok_or_else(invalid)?;
        let name = location
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(invalid)?;
        let current = self.current.ok_or_else(invalid)?;
        let temperature = current.temperature().ok_or_else(invalid)?;
        let description = current.description().unwrap_or_default().to_string();

        Ok(SavedWeather::new(
            ResolvedLocation::new(name, location.lat, location.lon),
            temperature,
            description,
            self.forecast,
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct TemperatureUpdate {
    pub temperature: f64,
}

pub async fn save_weather(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SaveWeatherPayload>,
) -> Result<ApiResponse<SavedWeather>> {
    let record = payload.into_record()?;
    state.store.saved.put(&record).await?;
    info!("Saved weather for '{}' as {}", record.location.name, record.id);
    Ok(ApiResponse::ok(record).with_message("Weather data saved successfully"))
}

pub async fn list_saved(State(state): State<AppState>) -> Result<ApiResponse<Vec<SavedWeather>>> {
    Ok(ApiResponse::ok(state.store.list_saved().await?))
}

pub async fn update_saved(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<TemperatureUpdate>,
) -> Result<ApiResponse<SavedWeather>> {
    let record = state
        .store
        .update_saved_temperature(&id, update.temperature)
        .await?;
    Ok(ApiResponse::ok(record).with_message("Record updated"))
}

pub async fn delete_saved(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<SavedWeather>> {
    let removed = state
        .store
        .saved
        .remove(&id)
        .await?
        .ok_or_else(|| WeatherDeskError::record_not_found(&id))?;
    info!("Deleted saved weather {id}");
    Ok(ApiResponse::ok(removed).with_message("Record deleted"))
}
