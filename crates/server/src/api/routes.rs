use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::middleware::{auth_middleware, metrics_middleware};
use super::{authors, books, categories, handlers, stats};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Service
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/whoami", get(handlers::whoami))
        .route("/metrics", get(handlers::metrics))
        // Authors
        .route(
            "/authors",
            get(authors::list_authors).post(authors::create_author),
        )
        .route(
            "/authors/{id}",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        // Categories
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/insights", get(books::get_insights))
        .route(
            "/books/{id}",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Stats
        .route("/stats/books/count", get(stats::total_books))
        .route(
            "/stats/books/average-publication-year",
            get(stats::average_publication_year),
        )
        .route("/stats/books/first-n", get(stats::first_n_books))
        .route(
            "/stats/authors/{id}/oldest-newest-books",
            get(stats::oldest_newest_books),
        )
        .route("/stats/authors/{id}/has-books", get(stats::author_has_books))
        .route("/stats/authors/book-count", get(stats::books_per_author))
        .route("/stats/authors/unique", get(stats::unique_authors))
        .route("/stats/authors/books", get(stats::books_by_author))
        .route(
            "/stats/categories/{id}/publication-year-check",
            get(stats::publication_year_check),
        )
        .route(
            "/stats/categories/{id}/has-books",
            get(stats::category_has_books),
        )
        .route("/stats/categories/book-count", get(stats::books_per_category))
        .route("/stats/categories/authors", get(stats::authors_per_category))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        // Layers run bottom-up: trace, metrics, then auth
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
