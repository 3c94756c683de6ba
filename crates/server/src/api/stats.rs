//! Stats API handlers.
//!
//! Aggregates never require the referenced author or category to exist; an
//! unknown id reads as "no books".

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, Json};
use libris_core::library::{AuthorBookCount, CategoryBookCount, TitledYear};
use libris_core::Book;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::extract::{ApiPath, ApiQuery};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct TotalBooksResponse {
    pub total_books: u64,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AverageYearResponse {
    Computed {
        average_publication_year: f64,
    },
    NoBooks {
        average_publication_year: u8,
        message: &'static str,
    },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum OldestNewestResponse {
    Found {
        author_id: i64,
        oldest_book: TitledYear,
        newest_book: TitledYear,
    },
    NoBooks {
        message: &'static str,
    },
}

#[derive(Debug, Deserialize)]
pub struct FirstNParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    5
}

#[derive(Debug, Serialize)]
pub struct FirstNResponse {
    pub limit: u32,
    pub books: Vec<Book>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum YearCheckResponse {
    Checked {
        category_id: i64,
        all_books_have_publication_year: bool,
    },
    NoBooks {
        category_id: i64,
        message: &'static str,
    },
}

#[derive(Debug, Serialize)]
pub struct AuthorHasBooksResponse {
    pub author_id: i64,
    pub has_books: bool,
}

#[derive(Debug, Serialize)]
pub struct CategoryHasBooksResponse {
    pub category_id: i64,
    pub has_books: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /stats/books/count
pub async fn total_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TotalBooksResponse>, ApiError> {
    let total_books = state.library().total_books()?;
    Ok(Json(TotalBooksResponse { total_books }))
}

/// GET /stats/books/average-publication-year
pub async fn average_publication_year(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AverageYearResponse>, ApiError> {
    let response = match state.library().average_publication_year()? {
        Some(average) => AverageYearResponse::Computed {
            average_publication_year: average,
        },
        None => AverageYearResponse::NoBooks {
            average_publication_year: 0,
            message: "No books available",
        },
    };
    Ok(Json(response))
}

/// GET /stats/authors/{id}/oldest-newest-books
pub async fn oldest_newest_books(
    State(state): State<Arc<AppState>>,
    ApiPath(author_id): ApiPath<i64>,
) -> Result<Json<OldestNewestResponse>, ApiError> {
    let response = match state.library().oldest_newest_books(author_id)? {
        Some(extremes) => OldestNewestResponse::Found {
            author_id,
            oldest_book: extremes.oldest,
            newest_book: extremes.newest,
        },
        None => OldestNewestResponse::NoBooks {
            message: "This author has no books",
        },
    };
    Ok(Json(response))
}

/// GET /stats/books/first-n?limit=N
pub async fn first_n_books(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<FirstNParams>,
) -> Result<Json<FirstNResponse>, ApiError> {
    let books = state.library().first_n_books(params.limit)?;
    Ok(Json(FirstNResponse {
        limit: params.limit,
        books,
    }))
}

/// GET /stats/categories/{id}/publication-year-check
pub async fn publication_year_check(
    State(state): State<Arc<AppState>>,
    ApiPath(category_id): ApiPath<i64>,
) -> Result<Json<YearCheckResponse>, ApiError> {
    let response = match state.library().category_years_complete(category_id)? {
        Some(complete) => YearCheckResponse::Checked {
            category_id,
            all_books_have_publication_year: complete,
        },
        None => YearCheckResponse::NoBooks {
            category_id,
            message: "No books found in this category",
        },
    };
    Ok(Json(response))
}

/// GET /stats/authors/{id}/has-books
pub async fn author_has_books(
    State(state): State<Arc<AppState>>,
    ApiPath(author_id): ApiPath<i64>,
) -> Result<Json<AuthorHasBooksResponse>, ApiError> {
    let has_books = state.library().author_has_books(author_id)?;
    Ok(Json(AuthorHasBooksResponse {
        author_id,
        has_books,
    }))
}

/// GET /stats/categories/{id}/has-books
pub async fn category_has_books(
    State(state): State<Arc<AppState>>,
    ApiPath(category_id): ApiPath<i64>,
) -> Result<Json<CategoryHasBooksResponse>, ApiError> {
    let has_books = state.library().category_has_books(category_id)?;
    Ok(Json(CategoryHasBooksResponse {
        category_id,
        has_books,
    }))
}

/// GET /stats/authors/book-count
pub async fn books_per_author(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AuthorBookCount>>, ApiError> {
    Ok(Json(state.library().books_per_author()?))
}

/// GET /stats/categories/book-count
pub async fn books_per_category(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryBookCount>>, ApiError> {
    Ok(Json(state.library().books_per_category()?))
}

/// GET /stats/authors/unique
pub async fn unique_authors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.library().unique_author_names()?))
}

/// GET /stats/categories/authors
pub async fn authors_per_category(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Vec<String>>>, ApiError> {
    Ok(Json(state.library().authors_per_category()?))
}

/// GET /stats/authors/books
pub async fn books_by_author(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Vec<TitledYear>>>, ApiError> {
    Ok(Json(state.library().books_by_author()?))
}
