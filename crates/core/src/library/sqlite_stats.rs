//! Aggregate queries over the SQLite library store.

use std::collections::BTreeMap;

use rusqlite::params;

use super::sqlite::SqliteLibrary;
use super::{
    AuthorBookCount, Book, CategoryBookCount, LibraryError, LibraryStats, OldestNewest, TitledYear,
};

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl LibraryStats for SqliteLibrary {
    fn total_books(&self) -> Result<u64, LibraryError> {
        let conn = self.conn()?;
        let total = conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
        Ok(total)
    }

    fn average_publication_year(&self) -> Result<Option<f64>, LibraryError> {
        let conn = self.conn()?;
        let average: Option<f64> =
            conn.query_row("SELECT AVG(publication_year) FROM books", [], |row| {
                row.get(0)
            })?;
        Ok(average.map(round_to_hundredths))
    }

    fn oldest_newest_books(&self, author_id: i64) -> Result<Option<OldestNewest>, LibraryError> {
        let conn = self.conn()?;
        // SQLite sorts NULL years first in ascending order
        let mut stmt = conn.prepare(
            "SELECT title, publication_year FROM books
             WHERE author_id = ?1
             ORDER BY publication_year, id",
        )?;
        let books = stmt
            .query_map(params![author_id], |row| {
                Ok(TitledYear {
                    title: row.get(0)?,
                    publication_year: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(match (books.first(), books.last()) {
            (Some(oldest), Some(newest)) => Some(OldestNewest {
                oldest: oldest.clone(),
                newest: newest.clone(),
            }),
            _ => None,
        })
    }

    fn first_n_books(&self, limit: u32) -> Result<Vec<Book>, LibraryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, isbn, publication_year, author_id, category_id FROM books
             ORDER BY title ASC, id ASC
             LIMIT ?1",
        )?;
        let books = stmt
            .query_map(params![i64::from(limit)], SqliteLibrary::row_to_book)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    fn category_years_complete(&self, category_id: i64) -> Result<Option<bool>, LibraryError> {
        let conn = self.conn()?;
        let (total, missing_year): (u64, u64) = conn.query_row(
            "SELECT COUNT(*), COUNT(*) - COUNT(publication_year)
             FROM books WHERE category_id = ?1",
            params![category_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        if total == 0 {
            return Ok(None);
        }
        Ok(Some(missing_year == 0))
    }

    fn author_has_books(&self, author_id: i64) -> Result<bool, LibraryError> {
        let conn = self.conn()?;
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM books WHERE author_id = ?1)",
            params![author_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn category_has_books(&self, category_id: i64) -> Result<bool, LibraryError> {
        let conn = self.conn()?;
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM books WHERE category_id = ?1)",
            params![category_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn books_per_author(&self) -> Result<Vec<AuthorBookCount>, LibraryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT a.name, COUNT(b.id)
             FROM authors a
             LEFT JOIN books b ON b.author_id = a.id
             GROUP BY a.id
             ORDER BY a.id",
        )?;
        let counts = stmt
            .query_map([], |row| {
                Ok(AuthorBookCount {
                    author_name: row.get(0)?,
                    book_count: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }

    fn books_per_category(&self) -> Result<Vec<CategoryBookCount>, LibraryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT c.name, COUNT(b.id)
             FROM categories c
             LEFT JOIN books b ON b.category_id = c.id
             GROUP BY c.id
             ORDER BY c.id",
        )?;
        let counts = stmt
            .query_map([], |row| {
                Ok(CategoryBookCount {
                    category_name: row.get(0)?,
                    book_count: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }

    fn unique_author_names(&self) -> Result<Vec<String>, LibraryError> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT name FROM authors GROUP BY name ORDER BY MIN(id)")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn authors_per_category(&self) -> Result<BTreeMap<String, Vec<String>>, LibraryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT c.name, a.name
             FROM books b
             JOIN categories c ON c.id = b.category_id
             JOIN authors a ON a.id = b.author_id
             GROUP BY c.name, a.name
             ORDER BY MIN(b.id)",
        )?;
        let pairs = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut by_category: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (category, author) in pairs {
            by_category.entry(category).or_default().push(author);
        }
        Ok(by_category)
    }

    fn books_by_author(&self) -> Result<BTreeMap<String, Vec<TitledYear>>, LibraryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT a.name, b.title, b.publication_year
             FROM books b
             JOIN authors a ON a.id = b.author_id
             ORDER BY a.name, b.publication_year, b.id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    TitledYear {
                        title: row.get(1)?,
                        publication_year: row.get(2)?,
                    },
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut by_author: BTreeMap<String, Vec<TitledYear>> = BTreeMap::new();
        for (author, book) in rows {
            by_author.entry(author).or_default().push(book);
        }
        Ok(by_author)
    }
}
