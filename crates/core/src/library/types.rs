//! Record model for the library catalog: authors, categories and books.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A persisted author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
}

/// Full-replace payload for creating or updating an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
}

/// A persisted category. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Full-replace payload for creating or updating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

/// A persisted book.
///
/// `author_id` and `category_id` referred to existing rows when the book was
/// last written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub isbn: Option<String>,
    pub publication_year: Option<i64>,
    pub author_id: i64,
    pub category_id: i64,
}

/// Full-replace payload for creating or updating a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i64>,
    pub author_id: i64,
    pub category_id: i64,
}

/// A book joined with its author's name. `author_name` is `None` when the
/// author row can't be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookWithAuthor {
    pub id: i64,
    pub title: String,
    pub publication_year: Option<i64>,
    pub author_name: Option<String>,
}

/// Row counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LibraryCounts {
    pub authors: u64,
    pub categories: u64,
    pub books: u64,
}

/// A title and its publication year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitledYear {
    pub title: String,
    pub publication_year: Option<i64>,
}

/// Earliest and latest book of an author in ascending year order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OldestNewest {
    pub oldest: TitledYear,
    pub newest: TitledYear,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorBookCount {
    pub author_name: String,
    pub book_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBookCount {
    pub category_name: String,
    pub book_count: u64,
}

/// Errors for library operations.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LibraryError {
    pub fn author_not_found() -> Self {
        Self::NotFound("Author not found".to_string())
    }

    pub fn category_not_found() -> Self {
        Self::NotFound("Category not found".to_string())
    }

    pub fn book_not_found() -> Self {
        Self::NotFound("Book not found".to_string())
    }
}

impl From<rusqlite::Error> for LibraryError {
    fn from(e: rusqlite::Error) -> Self {
        LibraryError::Database(e.to_string())
    }
}

fn require_text(field: &str, value: &str) -> Result<(), LibraryError> {
    if value.trim().is_empty() {
        return Err(LibraryError::Invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

impl NewAuthor {
    pub fn validate(&self) -> Result<(), LibraryError> {
        require_text("name", &self.name)
    }
}

impl NewCategory {
    pub fn validate(&self) -> Result<(), LibraryError> {
        require_text("name", &self.name)
    }
}

impl NewBook {
    pub fn validate(&self) -> Result<(), LibraryError> {
        require_text("title", &self.title)
    }
}
