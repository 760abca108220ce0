//! Data models for the `WeatherDesk` application
//!
//! This module contains the core domain models organized by concern:
//! - Location: resolved coordinates and display name
//! - Forecast: raw provider intervals and daily summaries
//! - Weather: current conditions and the composed snapshot
//! - Records: saved snapshots and lookup history

pub mod forecast;
pub mod location;
pub mod records;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{DailyForecast, RawForecastInterval};
pub use location::{ResolvedLocation, coordinates_in_range, format_coordinates, join_name_parts};
pub use records::{SavedForecastDay, SavedWeather, WeatherRequest};
pub use weather::{Condition, Coordinates, CurrentConditions, MainReadings, SystemInfo, WeatherSnapshot};
