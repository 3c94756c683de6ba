//! Library catalog storage.
//!
//! Authors, categories and books live in a relational store. Books reference
//! exactly one author and one category; the store checks both references on
//! every book write.

mod sqlite;
mod sqlite_stats;
mod types;

use std::collections::BTreeMap;

pub use sqlite::SqliteLibrary;
pub use types::*;

/// CRUD over the three record types.
///
/// Updates are full replacements. Deletes of missing rows fail with
/// `LibraryError::NotFound`.
pub trait LibraryStore: Send + Sync {
    fn create_author(&self, author: &NewAuthor) -> Result<Author, LibraryError>;

    fn get_author(&self, id: i64) -> Result<Author, LibraryError>;

    /// All authors in insertion order.
    fn list_authors(&self) -> Result<Vec<Author>, LibraryError>;

    fn update_author(&self, id: i64, author: &NewAuthor) -> Result<Author, LibraryError>;

    /// Fails with `Conflict` while any book still references the author.
    fn delete_author(&self, id: i64) -> Result<(), LibraryError>;

    /// Fails with `Conflict` if the name is already taken.
    fn create_category(&self, category: &NewCategory) -> Result<Category, LibraryError>;

    fn get_category(&self, id: i64) -> Result<Category, LibraryError>;

    /// All categories in insertion order.
    fn list_categories(&self) -> Result<Vec<Category>, LibraryError>;

    fn update_category(&self, id: i64, category: &NewCategory)
        -> Result<Category, LibraryError>;

    /// Fails with `Conflict` while any book still references the category.
    fn delete_category(&self, id: i64) -> Result<(), LibraryError>;

    /// Fails with `NotFound` if the author or category doesn't exist; nothing
    /// is written in that case.
    fn create_book(&self, book: &NewBook) -> Result<Book, LibraryError>;

    fn get_book(&self, id: i64) -> Result<Book, LibraryError>;

    /// All books in insertion order.
    fn list_books(&self) -> Result<Vec<Book>, LibraryError>;

    fn update_book(&self, id: i64, book: &NewBook) -> Result<Book, LibraryError>;

    fn delete_book(&self, id: i64) -> Result<(), LibraryError>;

    /// Snapshot of every book with its author's name, in insertion order.
    fn books_with_authors(&self) -> Result<Vec<BookWithAuthor>, LibraryError>;

    fn counts(&self) -> Result<LibraryCounts, LibraryError>;
}

/// Read-only aggregate queries.
pub trait LibraryStats: Send + Sync {
    fn total_books(&self) -> Result<u64, LibraryError>;

    /// Mean publication year over books that have one, rounded to 2 decimals.
    /// `None` when no book has a year.
    fn average_publication_year(&self) -> Result<Option<f64>, LibraryError>;

    /// `None` when the author has no books.
    fn oldest_newest_books(&self, author_id: i64) -> Result<Option<OldestNewest>, LibraryError>;

    /// First `limit` books ordered by title.
    fn first_n_books(&self, limit: u32) -> Result<Vec<Book>, LibraryError>;

    /// Whether every book in the category has a publication year. `None` when
    /// the category has no books.
    fn category_years_complete(&self, category_id: i64) -> Result<Option<bool>, LibraryError>;

    fn author_has_books(&self, author_id: i64) -> Result<bool, LibraryError>;

    fn category_has_books(&self, category_id: i64) -> Result<bool, LibraryError>;

    /// Every author with its book count, zero included.
    fn books_per_author(&self) -> Result<Vec<AuthorBookCount>, LibraryError>;

    /// Every category with its book count, zero included.
    fn books_per_category(&self) -> Result<Vec<CategoryBookCount>, LibraryError>;

    fn unique_author_names(&self) -> Result<Vec<String>, LibraryError>;

    /// Category name to the distinct names of authors with a book in it.
    fn authors_per_category(&self) -> Result<BTreeMap<String, Vec<String>>, LibraryError>;

    /// Author name to that author's books sorted by year.
    fn books_by_author(&self) -> Result<BTreeMap<String, Vec<TitledYear>>, LibraryError>;
}

/// A complete library backend.
pub trait Library: LibraryStore + LibraryStats {}

impl<T: LibraryStore + LibraryStats> Library for T {}
