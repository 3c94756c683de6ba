//! Book API handlers, including insights.

use std::sync::Arc;

use axum::{extract::State, Json};
use libris_core::{load_insights, Book, BookInsights, NewBook};

use super::error::ApiError;
use super::extract::{ApiJson, ApiPath};
use super::handlers::MessageResponse;
use crate::metrics::record_write;
use crate::state::AppState;

/// POST /books
///
/// 404 if `author_id` or `category_id` doesn't resolve; nothing is stored.
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<NewBook>,
) -> Result<Json<Book>, ApiError> {
    let book = state.library().create_book(&payload)?;
    record_write("book", "create");
    Ok(Json(book))
}

/// GET /books
pub async fn list_books(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.library().list_books()?))
}

/// GET /books/{id}
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Book>, ApiError> {
    Ok(Json(state.library().get_book(id)?))
}

/// PUT /books/{id}
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<NewBook>,
) -> Result<Json<Book>, ApiError> {
    let book = state.library().update_book(id, &payload)?;
    record_write("book", "update");
    Ok(Json(book))
}

/// DELETE /books/{id}
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.library().delete_book(id)?;
    record_write("book", "delete");
    Ok(MessageResponse::new("Book deleted successfully"))
}

/// GET /books/insights
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BookInsights>, ApiError> {
    Ok(Json(load_insights(state.library())?))
}
