//! Category API handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use libris_core::{Category, NewCategory};

use super::error::ApiError;
use super::extract::{ApiJson, ApiPath};
use super::handlers::MessageResponse;
use crate::metrics::record_write;
use crate::state::AppState;

/// POST /categories
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<NewCategory>,
) -> Result<Json<Category>, ApiError> {
    let category = state.library().create_category(&payload)?;
    record_write("category", "create");
    Ok(Json(category))
}

/// GET /categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.library().list_categories()?))
}

/// GET /categories/{id}
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(state.library().get_category(id)?))
}

/// PUT /categories/{id}
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<NewCategory>,
) -> Result<Json<Category>, ApiError> {
    let category = state.library().update_category(id, &payload)?;
    record_write("category", "update");
    Ok(Json(category))
}

/// DELETE /categories/{id}
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.library().delete_category(id)?;
    record_write("category", "delete");
    Ok(MessageResponse::new("Category deleted successfully"))
}
