use axum::extract::State;
use serde::Deserialize;

use super::{ApiQuery, AppState, ApiResponse};
use crate::models::WeatherSnapshot;
use crate::{Result, WeatherDeskError};

#[derive(Debug, Default, Deserialize)]
pub struct WeatherParams {
    pub query: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl WeatherParams {
    /// Location input for the resolver; `lat` and `lon` together win over `query`
    pub fn location_input(&self) -> Result<String> {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        match (non_blank(&self.lat), non_blank(&self.lon), non_blank(&self.query)) {
            (Some(lat), Some(lon), _) => Ok(format!("{lat},{lon}")),
            (_, _, Some(query)) => Ok(query),
            _ => Err(WeatherDeskError::invalid_input("Provide query or lat & lon")),
        }
    }
}

pub async fn get_weather(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<WeatherParams>,
) -> Result<ApiResponse<WeatherSnapshot>> {
    let input = params.location_input()?;
    let snapshot = state.lookup.resolve_weather(&input).await?;
    Ok(ApiResponse::ok(snapshot))
}
