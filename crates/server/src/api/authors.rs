//! Author API handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use libris_core::{Author, NewAuthor};

use super::error::ApiError;
use super::extract::{ApiJson, ApiPath};
use super::handlers::MessageResponse;
use crate::metrics::record_write;
use crate::state::AppState;

/// POST /authors
pub async fn create_author(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<NewAuthor>,
) -> Result<Json<Author>, ApiError> {
    let author = state.library().create_author(&payload)?;
    record_write("author", "create");
    Ok(Json(author))
}

/// GET /authors
pub async fn list_authors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Author>>, ApiError> {
    Ok(Json(state.library().list_authors()?))
}

/// GET /authors/{id}
pub async fn get_author(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Author>, ApiError> {
    Ok(Json(state.library().get_author(id)?))
}

/// PUT /authors/{id}
///
/// Full replacement; an omitted `bio` clears it.
pub async fn update_author(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<NewAuthor>,
) -> Result<Json<Author>, ApiError> {
    let author = state.library().update_author(id, &payload)?;
    record_write("author", "update");
    Ok(Json(author))
}

/// DELETE /authors/{id}
pub async fn delete_author(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.library().delete_author(id)?;
    record_write("author", "delete");
    Ok(MessageResponse::new("Author deleted successfully"))
}
