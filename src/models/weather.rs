//! Current conditions payload and the composed weather snapshot

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{DailyForecast, ResolvedLocation, join_name_parts};

/// Current conditions as returned by the provider.
///
/// Only the fields the application reads are typed; everything else is kept
/// in `extra` so the payload is passed through to clients unchanged.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct CurrentConditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coord: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<MainReadings>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weather: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys: Option<SystemInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Temperature block (`main`) of the current conditions
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct MainReadings {
    /// Temperature in Celsius
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct SystemInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CurrentConditions {
    /// Ambient temperature in Celsius
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.main.as_ref().and_then(|main| main.temp)
    }

    /// First reported condition description, if any
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.weather
            .first()
            .and_then(|condition| condition.description.as_deref())
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.coord.map(|coord| (coord.lat, coord.lon))
    }

    /// Station or city name the provider echoes, with its country
    /// (`"Ahmednagar, IN"`). Empty when the provider reports neither.
    #[must_use]
    pub fn display_name(&self) -> String {
        join_name_parts([
            self.name.as_deref(),
            self.sys.as_ref().and_then(|sys| sys.country.as_deref()),
        ])
    }
}

/// Current conditions plus aggregated forecast for one resolved location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub location: ResolvedLocation,
    pub current: CurrentConditions,
    pub forecast: Vec<DailyForecast>,
    /// Alternate matches, only present after free-text geocoding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<ResolvedLocation>>,
}
