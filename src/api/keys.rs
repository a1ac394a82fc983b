//! Access key endpoints

use axum::{extract::State, Json};
use tracing::error;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::access_key::KeyRecord;

/// Message returned when the persisted collection cannot be read
pub const READ_ERROR_MESSAGE: &str = "Error reading JSON file";

/// Issue a new access key, subject to the global cooldown
pub async fn generate_key(State(state): State<AppState>) -> Result<Json<KeyRecord>, ApiError> {
    let record = state.access_key_service.issue().await?;

    Ok(Json(record))
}

/// Return the raw persisted key collection
pub async fn list_keys(State(state): State<AppState>) -> Result<Json<Vec<KeyRecord>>, ApiError> {
    let records = state.access_key_service.list().await.map_err(|e| {
        error!(error = %e, "Failed to read key collection");
        ApiError::internal(READ_ERROR_MESSAGE)
    })?;

    Ok(Json(records))
}

/// Plaintext landing page
pub async fn welcome() -> &'static str {
    "Welcome"
}
