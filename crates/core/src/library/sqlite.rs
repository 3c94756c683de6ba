//! SQLite-backed library store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::{debug, info};

use super::{
    Author, Book, BookWithAuthor, Category, LibraryCounts, LibraryError, LibraryStore, NewAuthor,
    NewBook, NewCategory,
};

const BOOK_COLUMNS: &str = "id, title, isbn, publication_year, author_id, category_id";

/// SQLite-backed library store.
///
/// Every operation holds the connection for exactly its own duration; the
/// guard is dropped on all return paths.
pub struct SqliteLibrary {
    conn: Mutex<Connection>,
}

impl SqliteLibrary {
    /// Open (or create) the database file and ensure the schema exists.
    pub fn new(path: &Path) -> Result<Self, LibraryError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        info!(path = %path.display(), "Library database opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite store (useful for testing).
    pub fn in_memory() -> Result<Self, LibraryError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), LibraryError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS authors (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                bio TEXT
            );

            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                isbn TEXT,
                publication_year INTEGER,
                author_id INTEGER NOT NULL REFERENCES authors(id),
                category_id INTEGER NOT NULL REFERENCES categories(id)
            );

            CREATE INDEX IF NOT EXISTS idx_books_author_id ON books(author_id);
            CREATE INDEX IF NOT EXISTS idx_books_category_id ON books(category_id);
            CREATE INDEX IF NOT EXISTS idx_books_title ON books(title);
            "#,
        )?;

        Ok(())
    }

    /// Acquire the connection for one operation.
    pub(super) fn conn(&self) -> Result<MutexGuard<'_, Connection>, LibraryError> {
        self.conn
            .lock()
            .map_err(|_| LibraryError::Internal("database connection lock poisoned".to_string()))
    }

    fn row_exists(conn: &Connection, table: &str, id: i64) -> Result<bool, LibraryError> {
        let sql = format!("SELECT 1 FROM {table} WHERE id = ?1");
        let found = conn
            .query_row(&sql, params![id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn is_referenced(conn: &Connection, column: &str, id: i64) -> Result<bool, LibraryError> {
        let sql = format!("SELECT 1 FROM books WHERE {column} = ?1 LIMIT 1");
        let found = conn
            .query_row(&sql, params![id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    /// Author first, then category.
    fn check_book_references(conn: &Connection, book: &NewBook) -> Result<(), LibraryError> {
        if !Self::row_exists(conn, "authors", book.author_id)? {
            return Err(LibraryError::author_not_found());
        }
        if !Self::row_exists(conn, "categories", book.category_id)? {
            return Err(LibraryError::category_not_found());
        }
        Ok(())
    }

    pub(super) fn row_to_book(row: &rusqlite::Row) -> rusqlite::Result<Book> {
        Ok(Book {
            id: row.get(0)?,
            title: row.get(1)?,
            isbn: row.get(2)?,
            publication_year: row.get(3)?,
            author_id: row.get(4)?,
            category_id: row.get(5)?,
        })
    }

    fn row_to_author(row: &rusqlite::Row) -> rusqlite::Result<Author> {
        Ok(Author {
            id: row.get(0)?,
            name: row.get(1)?,
            bio: row.get(2)?,
        })
    }

    fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}

fn category_write_error(e: rusqlite::Error) -> LibraryError {
    if is_constraint_violation(&e) {
        LibraryError::Conflict("Category already exists".to_string())
    } else {
        LibraryError::from(e)
    }
}

impl LibraryStore for SqliteLibrary {
    fn create_author(&self, author: &NewAuthor) -> Result<Author, LibraryError> {
        author.validate()?;
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO authors (name, bio) VALUES (?1, ?2)",
            params![&author.name, &author.bio],
        )?;
        let id = conn.last_insert_rowid();
        debug!(author_id = id, "Author created");

        Ok(Author {
            id,
            name: author.name.clone(),
            bio: author.bio.clone(),
        })
    }

    fn get_author(&self, id: i64) -> Result<Author, LibraryError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, bio FROM authors WHERE id = ?1",
            params![id],
            Self::row_to_author,
        )
        .optional()?
        .ok_or_else(LibraryError::author_not_found)
    }

    fn list_authors(&self) -> Result<Vec<Author>, LibraryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, bio FROM authors ORDER BY id")?;
        let authors = stmt
            .query_map([], Self::row_to_author)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(authors)
    }

    fn update_author(&self, id: i64, author: &NewAuthor) -> Result<Author, LibraryError> {
        author.validate()?;
        let conn = self.conn()?;

        let rows_affected = conn.execute(
            "UPDATE authors SET name = ?1, bio = ?2 WHERE id = ?3",
            params![&author.name, &author.bio, id],
        )?;
        if rows_affected == 0 {
            return Err(LibraryError::author_not_found());
        }
        debug!(author_id = id, "Author updated");

        Ok(Author {
            id,
            name: author.name.clone(),
            bio: author.bio.clone(),
        })
    }

    fn delete_author(&self, id: i64) -> Result<(), LibraryError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        if !Self::row_exists(&tx, "authors", id)? {
            return Err(LibraryError::author_not_found());
        }
        if Self::is_referenced(&tx, "author_id", id)? {
            return Err(LibraryError::Conflict(
                "Author still has books; delete or reassign them first".to_string(),
            ));
        }

        tx.execute("DELETE FROM authors WHERE id = ?1", params![id])?;
        tx.commit()?;
        info!(author_id = id, "Author deleted");
        Ok(())
    }

    fn create_category(&self, category: &NewCategory) -> Result<Category, LibraryError> {
        category.validate()?;
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO categories (name) VALUES (?1)",
            params![&category.name],
        )
        .map_err(category_write_error)?;
        let id = conn.last_insert_rowid();
        debug!(category_id = id, "Category created");

        Ok(Category {
            id,
            name: category.name.clone(),
        })
    }

    fn get_category(&self, id: i64) -> Result<Category, LibraryError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name FROM categories WHERE id = ?1",
            params![id],
            Self::row_to_category,
        )
        .optional()?
        .ok_or_else(LibraryError::category_not_found)
    }

    fn list_categories(&self) -> Result<Vec<Category>, LibraryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY id")?;
        let categories = stmt
            .query_map([], Self::row_to_category)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn update_category(
        &self,
        id: i64,
        category: &NewCategory,
    ) -> Result<Category, LibraryError> {
        category.validate()?;
        let conn = self.conn()?;

        let rows_affected = conn
            .execute(
                "UPDATE categories SET name = ?1 WHERE id = ?2",
                params![&category.name, id],
            )
            .map_err(category_write_error)?;
        if rows_affected == 0 {
            return Err(LibraryError::category_not_found());
        }
        debug!(category_id = id, "Category updated");

        Ok(Category {
            id,
            name: category.name.clone(),
        })
    }

    fn delete_category(&self, id: i64) -> Result<(), LibraryError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        if !Self::row_exists(&tx, "categories", id)? {
            return Err(LibraryError::category_not_found());
        }
        if Self::is_referenced(&tx, "category_id", id)? {
            return Err(LibraryError::Conflict(
                "Category still has books; delete or reassign them first".to_string(),
            ));
        }

        tx.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        tx.commit()?;
        info!(category_id = id, "Category deleted");
        Ok(())
    }

    fn create_book(&self, book: &NewBook) -> Result<Book, LibraryError> {
        book.validate()?;
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        Self::check_book_references(&tx, book)?;

        tx.execute(
            "INSERT INTO books (title, isbn, publication_year, author_id, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &book.title,
                &book.isbn,
                book.publication_year,
                book.author_id,
                book.category_id,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        debug!(book_id = id, author_id = book.author_id, "Book created");

        Ok(Book {
            id,
            title: book.title.clone(),
            isbn: book.isbn.clone(),
            publication_year: book.publication_year,
            author_id: book.author_id,
            category_id: book.category_id,
        })
    }

    fn get_book(&self, id: i64) -> Result<Book, LibraryError> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"),
            params![id],
            Self::row_to_book,
        )
        .optional()?
        .ok_or_else(LibraryError::book_not_found)
    }

    fn list_books(&self) -> Result<Vec<Book>, LibraryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"))?;
        let books = stmt
            .query_map([], Self::row_to_book)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    fn update_book(&self, id: i64, book: &NewBook) -> Result<Book, LibraryError> {
        book.validate()?;
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        if !Self::row_exists(&tx, "books", id)? {
            return Err(LibraryError::book_not_found());
        }
        Self::check_book_references(&tx, book)?;

        tx.execute(
            "UPDATE books
             SET title = ?1, isbn = ?2, publication_year = ?3, author_id = ?4, category_id = ?5
             WHERE id = ?6",
            params![
                &book.title,
                &book.isbn,
                book.publication_year,
                book.author_id,
                book.category_id,
                id,
            ],
        )?;
        tx.commit()?;
        debug!(book_id = id, "Book updated");

        Ok(Book {
            id,
            title: book.title.clone(),
            isbn: book.isbn.clone(),
            publication_year: book.publication_year,
            author_id: book.author_id,
            category_id: book.category_id,
        })
    }

    fn delete_book(&self, id: i64) -> Result<(), LibraryError> {
        let conn = self.conn()?;

        let rows_affected = conn.execute("DELETE FROM books WHERE id = ?1", params![id])?;
        if rows_affected == 0 {
            return Err(LibraryError::book_not_found());
        }
        info!(book_id = id, "Book deleted");
        Ok(())
    }

    fn books_with_authors(&self) -> Result<Vec<BookWithAuthor>, LibraryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT b.id, b.title, b.publication_year, a.name
             FROM books b
             LEFT JOIN authors a ON a.id = b.author_id
             ORDER BY b.id",
        )?;
        let books = stmt
            .query_map([], |row| {
                Ok(BookWithAuthor {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    publication_year: row.get(2)?,
                    author_name: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    fn counts(&self) -> Result<LibraryCounts, LibraryError> {
        let conn = self.conn()?;
        let counts = conn.query_row(
            "SELECT (SELECT COUNT(*) FROM authors),
                    (SELECT COUNT(*) FROM categories),
                    (SELECT COUNT(*) FROM books)",
            [],
            |row| {
                Ok(LibraryCounts {
                    authors: row.get(0)?,
                    categories: row.get(1)?,
                    books: row.get(2)?,
                })
            },
        )?;
        Ok(counts)
    }
}
