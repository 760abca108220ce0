//! HTTP API routes

mod history;
mod records;
pub mod response;
mod weather;

use axum::{
    Json, Router,
    routing::{get, post, put},
};
use serde_json::{Value, json};

use crate::lookup::WeatherLookupService;
use crate::store::RecordStore;

pub use response::{ApiJson, ApiQuery, ApiResponse};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub lookup: WeatherLookupService,
    pub store: RecordStore,
}

impl AppState {
    #[must_use]
    pub fn new(lookup: WeatherLookupService, store: RecordStore) -> Self {
        Self { lookup, store }
    }
}

/// Routes under `/api`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/weather", get(weather::get_weather))
        .route("/save", post(records::save_weather))
        .route("/requests", get(records::list_saved))
        .route(
            "/requests/{id}",
            put(records::update_saved).delete(records::delete_saved),
        )
        .route(
            "/history",
            post(history::create_request).get(history::list_requests),
        )
        .route(
            "/history/{id}",
            get(history::get_request)
                .put(history::update_request)
                .delete(history::delete_request),
        )
}

pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "message": "WeatherDesk backend running" }))
}
