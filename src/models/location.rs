//! Location model for resolved geographic coordinates

use serde::{Deserialize, Serialize};

/// A location resolved from user input
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// Display name (city, region, country)
    pub name: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

impl ResolvedLocation {
    /// Create a new location
    #[must_use]
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format_coordinates(self.lat, self.lon)
    }

    /// Whether both coordinates fall inside the valid WGS84 ranges
    #[must_use]
    pub fn has_valid_coordinates(&self) -> bool {
        coordinates_in_range(self.lat, self.lon)
    }
}

#[must_use]
pub fn format_coordinates(lat: f64, lon: f64) -> String {
    format!("{lat:.4}, {lon:.4}")
}

#[must_use]
pub fn coordinates_in_range(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// Join display-name parts with `", "`, skipping empty ones
#[must_use]
pub fn join_name_parts<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coordinates() {
        let location = ResolvedLocation::new("", 19.15, 74.78);
        assert_eq!(location.format_coordinates(), "19.1500, 74.7800");
    }

    #[test]
    fn test_coordinate_ranges() {
        assert!(ResolvedLocation::new("x", 90.0, -180.0).has_valid_coordinates());
        assert!(!ResolvedLocation::new("x", 90.5, 0.0).has_valid_coordinates());
        assert!(!ResolvedLocation::new("x", 0.0, 181.0).has_valid_coordinates());
    }

    #[test]
    fn test_join_name_parts_skips_empty() {
        let name = join_name_parts([Some("Springfield"), Some(""), Some("US")]);
        assert_eq!(name, "Springfield, US");

        let name = join_name_parts([Some("Pune"), None, Some("IN")]);
        assert_eq!(name, "Pune, IN");

        assert_eq!(join_name_parts([None, Some("  ")]), "");
    }
}
