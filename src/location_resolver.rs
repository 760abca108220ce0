//! Location Resolution Module
//!
//! Classifies free-form location input (coordinates, postal codes, place
//! names) and resolves it to coordinates plus a display name by running an
//! ordered list of provider strategies until one succeeds.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::models::{CurrentConditions, ResolvedLocation, coordinates_in_range, join_name_parts};
use crate::weather::{GEOCODE_LIMIT, WeatherProvider};
use crate::{Result, WeatherDeskError};

static COORDINATE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?\d+(?:\.\d+)?),\s*([+-]?\d+(?:\.\d+)?)$").expect("valid coordinate pattern")
});

/// Types of location input
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    /// Coordinates (latitude, longitude)
    Coordinates(f64, f64),
    /// Pure-digit postal code, 3 to 10 digits
    PostalCode(String),
    /// Location name (city, region, etc.)
    Name(String),
}

/// Location parsing utilities
pub struct LocationParser;

impl LocationParser {
    /// Classify raw input; first matching shape wins
    pub fn parse(input: &str) -> Result<LocationInput> {
        let input = input.trim();
        if input.is_empty() {
            return Err(WeatherDeskError::invalid_input("Location cannot be empty"));
        }

        if let Some((lat, lon)) = Self::parse_coordinates(input)? {
            return Ok(LocationInput::Coordinates(lat, lon));
        }

        if Self::is_postal_code(input) {
            return Ok(LocationInput::PostalCode(input.to_string()));
        }

        Ok(LocationInput::Name(input.to_string()))
    }

    /// Parse `"lat,lon"`; `Ok(None)` when the input has another shape
    fn parse_coordinates(input: &str) -> Result<Option<(f64, f64)>> {
        let Some(captures) = COORDINATE_PAIR.captures(input) else {
            return Ok(None);
        };

        let parse = |s: &str| {
            s.parse::<f64>()
                .map_err(|_| WeatherDeskError::invalid_input(format!("Invalid coordinate: {s}")))
        };
        let lat = parse(&captures[1])?;
        let lon = parse(&captures[2])?;

        if !coordinates_in_range(lat, lon) {
            return Err(WeatherDeskError::invalid_input(format!(
                "Coordinates out of range: latitude must be within [-90, 90] and longitude within [-180, 180], got {lat}, {lon}"
            )));
        }

        Ok(Some((lat, lon)))
    }

    /// Pure digits, 3 to 10 of them
    fn is_postal_code(input: &str) -> bool {
        (3..=10).contains(&input.len()) && input.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Outcome of a successful resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Resolved coordinates; an empty name is filled from current conditions
    pub location: ResolvedLocation,
    /// Current conditions already fetched while resolving, if any
    pub current: Option<CurrentConditions>,
    /// All free-text geocoding matches
    pub candidates: Option<Vec<ResolvedLocation>>,
}

impl Resolution {
    fn at(location: ResolvedLocation) -> Self {
        Self {
            location,
            current: None,
            candidates: None,
        }
    }
}

/// One way of turning input into a location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Coordinates,
    PostalGeocode,
    PostalCurrentConditions,
    FreeText,
}

impl Strategy {
    /// Strategies to try for an input, in order
    #[must_use]
    pub fn plan(input: &LocationInput) -> &'static [Strategy] {
        match input {
            LocationInput::Coordinates(..) => &[Strategy::Coordinates],
            LocationInput::PostalCode(_) => &[
                Strategy::PostalGeocode,
                Strategy::PostalCurrentConditions,
                Strategy::FreeText,
            ],
            LocationInput::Name(_) => &[Strategy::FreeText],
        }
    }
}

/// Service for resolving location inputs
pub struct LocationResolver<'a> {
    provider: &'a dyn WeatherProvider,
}

impl<'a> LocationResolver<'a> {
    #[must_use]
    pub fn new(provider: &'a dyn WeatherProvider) -> Self {
        Self { provider }
    }

    /// Resolve raw input, failing with `LocationNotFound` once every strategy
    /// came up empty
    #[instrument(skip(self))]
    pub async fn resolve(&self, input: &str) -> Result<Resolution> {
        let parsed = LocationParser::parse(input)?;
        debug!("Resolving location input: {:?}", parsed);

        for strategy in Strategy::plan(&parsed) {
            if let Some(resolution) = self.attempt(*strategy, &parsed).await? {
                debug!(
                    "Resolved via {:?}: '{}' at ({}, {})",
                    strategy, resolution.location.name, resolution.location.lat, resolution.location.lon
                );
                return Ok(resolution);
            }
            debug!("Strategy {:?} yielded nothing, trying next", strategy);
        }

        Err(WeatherDeskError::location_not_found(input.trim()))
    }

    async fn attempt(&self, strategy: Strategy, input: &LocationInput) -> Result<Option<Resolution>> {
        match (strategy, input) {
            (Strategy::Coordinates, LocationInput::Coordinates(lat, lon)) => {
                Ok(Some(Resolution::at(ResolvedLocation::new(String::new(), *lat, *lon))))
            }
            (Strategy::PostalGeocode, LocationInput::PostalCode(code)) => {
                Ok(self.postal_geocode(code).await)
            }
            (Strategy::PostalCurrentConditions, LocationInput::PostalCode(code)) => {
                Ok(self.postal_current_conditions(code).await)
            }
            (Strategy::FreeText, LocationInput::PostalCode(text) | LocationInput::Name(text)) => {
                self.free_text(text).await
            }
            _ => Ok(None),
        }
    }

    /// Zip geocoding; failures fall through to the next strategy
    async fn postal_geocode(&self, code: &str) -> Option<Resolution> {
        match self.provider.geocode_by_postal_code(code).await {
            Ok(Some(found)) => {
                let name = found.name.unwrap_or_else(|| code.to_string());
                let location = ResolvedLocation::new(name, found.lat, found.lon);
                if !location.has_valid_coordinates() {
                    warn!(
                        "Zip geocoding for {} returned out-of-range coordinates ({}, {})",
                        code, location.lat, location.lon
                    );
                    return None;
                }
                Some(Resolution::at(location))
            }
            Ok(None) => None,
            Err(e) => {
                debug!("Zip geocoding failed for {}: {}", code, e);
                None
            }
        }
    }

    /// Current conditions by postal code; the payload is kept for the snapshot
    async fn postal_current_conditions(&self, code: &str) -> Option<Resolution> {
        let current = match self.provider.current_conditions_by_postal_code(code).await {
            Ok(current) => current,
            Err(e) => {
                debug!("Current conditions by postal code failed for {}: {}", code, e);
                return None;
            }
        };

        let Some((lat, lon)) = current.coordinates() else {
            debug!("Current conditions for {} carried no coordinates", code);
            return None;
        };
        if !coordinates_in_range(lat, lon) {
            warn!(
                "Current conditions for {} carried out-of-range coordinates ({}, {})",
                code, lat, lon
            );
            return None;
        }

        let name = current
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| code.to_string());

        Some(Resolution {
            location: ResolvedLocation::new(name, lat, lon),
            current: Some(current),
            candidates: None,
        })
    }

    /// General geocoding; the first usable match is primary, all usable
    /// matches are candidates
    async fn free_text(&self, text: &str) -> Result<Option<Resolution>> {
        let matches = self.provider.geocode_by_name(text, GEOCODE_LIMIT).await?;

        let candidates: Vec<ResolvedLocation> = matches
            .iter()
            .map(|m| {
                let name = join_name_parts([
                    Some(m.name.as_str()),
                    m.state.as_deref(),
                    m.country.as_deref(),
                ]);
                ResolvedLocation::new(name, m.lat, m.lon)
            })
            .filter(|candidate| {
                let valid = candidate.has_valid_coordinates();
                if !valid {
                    warn!(
                        "Dropping geocoding match '{}' with out-of-range coordinates ({}, {})",
                        candidate.name, candidate.lat, candidate.lon
                    );
                }
                valid
            })
            .collect();

        let Some(primary) = candidates.first().cloned() else {
            return Ok(None);
        };

        Ok(Some(Resolution {
            location: primary,
            current: None,
            candidates: Some(candidates),
        }))
    }
}
