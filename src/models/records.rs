//! Persisted records: user-saved snapshots and lookup history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ResolvedLocation, WeatherSnapshot};

/// Forecast day as stored with a saved record (no icon)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SavedForecastDay {
    pub date: String,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub summary: String,
}

/// Weather snapshot reduced to what the user chose to keep
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedWeather {
    pub id: String,
    pub location: ResolvedLocation,
    /// Temperature in Celsius, the only user-editable field
    pub temperature: f64,
    pub description: String,
    pub forecast: Vec<SavedForecastDay>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedWeather {
    #[must_use]
    pub fn new(
        location: ResolvedLocation,
        temperature: f64,
        description: String,
        forecast: Vec<SavedForecastDay>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            location,
            temperature,
            description,
            forecast,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_temperature(&mut self, temperature: f64) {
        self.temperature = temperature;
        self.updated_at = Utc::now();
    }
}

/// A past lookup together with the snapshot it produced
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRequest {
    pub id: String,
    /// Raw user input
    pub query: String,
    /// Canonical name from resolution
    pub location_name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "start_date", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(rename = "end_date", default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(rename = "result_snapshot")]
    pub result_snapshot: WeatherSnapshot,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WeatherRequest {
    #[must_use]
    pub fn new(
        query: String,
        snapshot: WeatherSnapshot,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            location_name: display_name_for(&query, &snapshot),
            lat: snapshot.location.lat,
            lon: snapshot.location.lon,
            query,
            start_date,
            end_date,
            result_snapshot: snapshot,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the query and every field derived from its resolution
    pub fn apply_snapshot(&mut self, query: String, snapshot: WeatherSnapshot) {
        self.location_name = display_name_for(&query, &snapshot);
        self.lat = snapshot.location.lat;
        self.lon = snapshot.location.lon;
        self.query = query;
        self.result_snapshot = snapshot;
        self.updated_at = Utc::now();
    }
}

fn display_name_for(query: &str, snapshot: &WeatherSnapshot) -> String {
    if snapshot.location.name.is_empty() {
        query.to_string()
    } else {
        snapshot.location.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurrentConditions, DailyForecast};

    fn snapshot(name: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            location: ResolvedLocation::new(name, 19.15, 74.78),
            current: CurrentConditions::default(),
            forecast: vec![DailyForecast {
                date: "2025-11-01".to_string(),
                min_temp: 18.0,
                max_temp: 29.0,
                icon: Some("01d".to_string()),
                summary: "clear sky".to_string(),
            }],
            candidates: None,
        }
    }

    #[test]
    fn test_saved_forecast_day_summary_defaults_empty() {
        let value = serde_json::json!({"date": "2025-11-01", "min": 18.0, "max": 29.0});
        let day: SavedForecastDay = serde_json::from_value(value).unwrap();
        assert_eq!(day.summary, "");
    }

    #[test]
    fn test_set_temperature_touches_updated_at() {
        let mut saved = SavedWeather::new(
            ResolvedLocation::new("Pune", 18.52, 73.85),
            25.0,
            "haze".to_string(),
            Vec::new(),
        );
        let created = saved.updated_at;

        saved.set_temperature(31.5);

        assert_eq!(saved.temperature, 31.5);
        assert!(saved.updated_at >= created);
        assert_eq!(saved.created_at, created);
    }

    #[test]
    fn test_weather_request_falls_back_to_query_for_name() {
        let request = WeatherRequest::new("19.15,74.78".to_string(), snapshot(""), None, None);
        assert_eq!(request.location_name, "19.15,74.78");
        assert_eq!(request.lat, 19.15);

        let request = WeatherRequest::new("ahmednagar".to_string(), snapshot("Ahmednagar, IN"), None, None);
        assert_eq!(request.location_name, "Ahmednagar, IN");
    }

    #[test]
    fn test_weather_request_wire_names() {
        let request = WeatherRequest::new("pune".to_string(), snapshot("Pune"), None, None);
        let json = serde_json::to_value(&request).unwrap();

        assert!(json.get("locationName").is_some());
        assert!(json.get("result_snapshot").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("start_date").is_none());
    }
}
