//! Forecast models: raw provider intervals and aggregated daily summaries

use serde::{Deserialize, Serialize};

/// One upstream forecast sample (3-hour granularity)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RawForecastInterval {
    /// Provider timestamp, e.g. `2025-11-01 12:00:00`
    pub timestamp: String,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Condition icon id
    pub icon: Option<String>,
    /// Human-readable condition text
    pub description: Option<String>,
}

impl RawForecastInterval {
    #[must_use]
    pub fn new(
        timestamp: impl Into<String>,
        temperature: f64,
        icon: Option<&str>,
        description: Option<&str>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            temperature,
            icon: icon.map(str::to_string),
            description: description.map(str::to_string),
        }
    }

    /// Calendar date portion of the timestamp, verbatim
    #[must_use]
    pub fn date(&self) -> &str {
        self.timestamp
            .split([' ', 'T'])
            .next()
            .unwrap_or(&self.timestamp)
    }
}

/// Aggregated forecast for a single calendar day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyForecast {
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(rename = "min")]
    pub min_temp: f64,
    #[serde(rename = "max")]
    pub max_temp: f64,
    pub icon: Option<String>,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_date_portion() {
        let interval = RawForecastInterval::new("2025-11-01 12:00:00", 10.0, None, None);
        assert_eq!(interval.date(), "2025-11-01");

        let interval = RawForecastInterval::new("2025-11-01T03:00:00", 10.0, None, None);
        assert_eq!(interval.date(), "2025-11-01");

        let interval = RawForecastInterval::new("2025-11-01", 10.0, None, None);
        assert_eq!(interval.date(), "2025-11-01");
    }

    #[test]
    fn test_daily_forecast_wire_names() {
        let day = DailyForecast {
            date: "2025-11-01".to_string(),
            min_temp: 10.0,
            max_temp: 15.5,
            icon: Some("01d".to_string()),
            summary: "clear sky".to_string(),
        };

        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["min"], 10.0);
        assert_eq!(json["max"], 15.5);
        assert_eq!(json["icon"], "01d");
    }
}
