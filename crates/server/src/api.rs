//! JSON API surface.
//!
//! - `GET /api/v1/trips/{trip_id}/suggestion` — fetch (or compute on first
//!   request) the budget and itinerary suggestion for a trip.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use tripweaver_core::{SuggestError, SuggestionEngine, TripId};

#[derive(Clone)]
pub struct ApiState {
    engine: Arc<SuggestionEngine>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

pub fn router(engine: Arc<SuggestionEngine>) -> Router {
    Router::new()
        .route("/api/v1/trips/{trip_id}/suggestion", get(get_suggestion))
        .with_state(ApiState { engine })
}

pub async fn get_suggestion(
    State(state): State<ApiState>,
    Path(trip_id): Path<String>,
) -> impl IntoResponse {
    let trip_id = TripId(trip_id);

    match state.engine.get_or_create(&trip_id).await {
        Ok(record) => {
            info!(
                event_name = "api.suggestion.served",
                trip_id = %trip_id,
                suggestion_id = %record.id.0,
                "suggestion served"
            );
            (StatusCode::OK, Json(record)).into_response()
        }
        Err(error @ SuggestError::TripNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ApiError { error: error.user_message().to_string() }),
        )
            .into_response(),
        Err(error @ SuggestError::Persistence(_)) => {
            // Internal detail stays in the log; the client gets a generic
            // message plus a correlation id to quote when reporting.
            let correlation_id = Uuid::new_v4().to_string();
            error!(
                event_name = "api.suggestion.failed",
                trip_id = %trip_id,
                correlation_id = %correlation_id,
                error = %error,
                "suggestion request failed"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError {
                    error: format!("{} (ref: {correlation_id})", error.user_message()),
                }),
            )
                .into_response()
        }
    }
}
