//! Response envelope and error mapping
//!
//! Every JSON response is `{ success, data?, message?, error? }`; errors carry
//! the user-facing message from [`WeatherDeskError::user_message`].

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::{ErrorCode, WeatherDeskError};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            status: StatusCode::OK,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::ok(data)
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorCode::LocationNotFound | ErrorCode::RecordNotFound => StatusCode::NOT_FOUND,
        ErrorCode::UpstreamError => StatusCode::BAD_GATEWAY,
        ErrorCode::StorageError | ErrorCode::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for WeatherDeskError {
    fn into_response(self) -> Response {
        let status = status_for(self.code());
        if status.is_server_error() {
            tracing::error!(code = self.code().as_str(), "{self}");
        } else {
            tracing::debug!(code = self.code().as_str(), "{self}");
        }

        let body = ApiResponse::<()> {
            success: false,
            data: None,
            message: None,
            error: Some(self.user_message()),
            status,
        };
        (status, Json(body)).into_response()
    }
}

/// JSON body extractor whose rejections render through the envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(WeatherDeskError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for WeatherDeskError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                WeatherDeskError::invalid_input(format!("Invalid JSON: {}", err.body_text()))
            }
            JsonRejection::JsonSyntaxError(err) => {
                WeatherDeskError::invalid_input(format!("JSON syntax error: {}", err.body_text()))
            }
            JsonRejection::MissingJsonContentType(_) => WeatherDeskError::invalid_input(
                "Missing `Content-Type: application/json` header",
            ),
            other => WeatherDeskError::invalid_input(other.body_text()),
        }
    }
}

/// Query-string extractor whose rejections render through the envelope
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(WeatherDeskError))]
pub struct ApiQuery<T>(pub T);

impl From<QueryRejection> for WeatherDeskError {
    fn from(rejection: QueryRejection) -> Self {
        WeatherDeskError::invalid_input(format!("Invalid query string: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorCode::InvalidInput), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorCode::LocationNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorCode::RecordNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorCode::UpstreamError), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(ErrorCode::StorageError),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body() {
        let response = WeatherDeskError::location_not_found("Atlantis").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Location not found");
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_query_rejection_uses_envelope() {
        #[derive(Debug, serde::Deserialize)]
        struct Params {
            #[allow(dead_code)]
            lat: Option<String>,
        }

        let (mut parts, ()) = axum::http::Request::builder()
            .uri("/weather?lat=1&lat=2")
            .body(())
            .unwrap()
            .into_parts();
        let Err(err) = ApiQuery::<Params>::from_request_parts(&mut parts, &()).await else {
            panic!("duplicate parameter should be rejected");
        };
        assert!(matches!(err, WeatherDeskError::InvalidInput { .. }));

        let body = body_json(err.into_response()).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid query string"));
    }

    #[tokio::test]
    async fn test_created_with_message() {
        let response = ApiResponse::created(42).with_message("stored").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], 42);
        assert_eq!(body["message"], "stored");
        assert!(body.get("error").is_none());
    }
}
