//! Lookup history: stored queries with the snapshot they produced

use axum::extract::{Path, State};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

use super::{ApiJson, AppState, ApiResponse};
use crate::models::WeatherRequest;
use crate::{Result, WeatherDeskError};

#[derive(Debug, Deserialize)]
pub struct CreateHistoryRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateHistoryRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp
pub fn parse_request_date(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| WeatherDeskError::invalid_input(format!("Invalid date '{value}'")))
}

fn parse_optional_date(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(parse_request_date)
        .transpose()
}

fn check_range(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<()> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => {
            Err(WeatherDeskError::invalid_input("Invalid date range"))
        }
        _ => Ok(()),
    }
}

fn required_query(query: &str) -> Result<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(WeatherDeskError::invalid_input("query is required"));
    }
    Ok(query)
}

pub async fn create_request(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateHistoryRequest>,
) -> Result<ApiResponse<WeatherRequest>> {
    let query = required_query(&body.query)?;
    let start = parse_optional_date(body.start_date.as_deref())?;
    let end = parse_optional_date(body.end_date.as_deref())?;
    check_range(start, end)?;

    let snapshot = state.lookup.resolve_weather(query).await?;
    let request = WeatherRequest::new(query.to_string(), snapshot, start, end);
    state.store.history.put(&request).await?;
    info!("Recorded lookup '{}' as {}", request.query, request.id);

    Ok(ApiResponse::created(request))
}

pub async fn list_requests(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<WeatherRequest>>> {
    Ok(ApiResponse::ok(state.store.list_history().await?))
}

async fn load(state: &AppState, id: &str) -> Result<WeatherRequest> {
    state
        .store
        .history
        .get(id)
        .await?
        .ok_or_else(|| WeatherDeskError::record_not_found(id))
}

pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<WeatherRequest>> {
    Ok(ApiResponse::ok(load(&state, &id).await?))
}

pub async fn update_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateHistoryRequest>,
) -> Result<ApiResponse<WeatherRequest>> {
    let start_change = body
        .start_date
        .as_deref()
        .map(|v| parse_optional_date(Some(v)))
        .transpose()?;
    let end_change = body
        .end_date
        .as_deref()
        .map(|v| parse_optional_date(Some(v)))
        .transpose()?;
    let query = body.query.as_deref().map(required_query).transpose()?;

    let current = load(&state, &id).await?;
    check_range(
        start_change.unwrap_or(current.start_date),
        end_change.unwrap_or(current.end_date),
    )?;

    // Resolution happens outside the store lock; the merge below re-checks.
    let snapshot = match query {
        Some(query) if query != current.query => {
            Some((query.to_string(), state.lookup.resolve_weather(query).await?))
        }
        _ => None,
    };

    let request = state
        .store
        .history
        .update(&id, move |request| {
            let start = start_change.unwrap_or(request.start_date);
            let end = end_change.unwrap_or(request.end_date);
            check_range(start, end)?;
            if let Some((query, snapshot)) = snapshot {
                request.apply_snapshot(query, snapshot);
            }
            request.start_date = start;
            request.end_date = end;
            request.updated_at = Utc::now();
            Ok(())
        })
        .await?;

    Ok(ApiResponse::ok(request))
}

pub async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<WeatherRequest>> {
    let removed = state
        .store
        .history
        .remove(&id)
        .await?
        .ok_or_else(|| WeatherDeskError::record_not_found(&id))?;
    info!("Deleted lookup {id}");
    Ok(ApiResponse::ok(removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2025-11-01", "2025-11-01T00:00:00+00:00")]
    #[case(" 2025-11-01 ", "2025-11-01T00:00:00+00:00")]
    #[case("2025-11-01T12:30:00Z", "2025-11-01T12:30:00+00:00")]
    #[case("2025-11-01T12:30:00+05:30", "2025-11-01T07:00:00+00:00")]
    fn test_parse_request_date(#[case] input: &str, #[case] expected: &str) {
        let parsed = parse_request_date(input).unwrap();
        assert_eq!(parsed.to_rfc3339(), expected);
    }

    #[rstest]
    #[case("01/11/2025")]
    #[case("2025-13-01")]
    #[case("tomorrow")]
    fn test_parse_request_date_rejects(#[case] input: &str) {
        assert!(matches!(
            parse_request_date(input),
            Err(WeatherDeskError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_blank_dates_are_absent() {
        assert_eq!(parse_optional_date(Some("  ")).unwrap(), None);
        assert_eq!(parse_optional_date(None).unwrap(), None);
    }

    #[test]
    fn test_check_range() {
        let early = parse_request_date("2025-11-01").ok();
        let late = parse_request_date("2025-11-05").ok();

        assert!(check_range(early, late).is_ok());
        assert!(check_range(early, early).is_ok());
        assert!(check_range(late, None).is_ok());
        let err = check_range(late, early).unwrap_err();
        assert_eq!(err.user_message(), "Invalid date range");
    }

    #[test]
    fn test_required_query() {
        assert_eq!(required_query("  Pune ").unwrap(), "Pune");
        assert!(required_query("   ").is_err());
    }
}
