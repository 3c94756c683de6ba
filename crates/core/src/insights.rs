//! Book insights: valid-book filtering, top authors and busy years.
//!
//! Operates on a full snapshot of the catalog. A book is *valid* when its
//! author resolves and its publication year lies in
//! `MIN_VALID_YEAR..=MAX_VALID_YEAR`; invalid books are skipped silently.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::library::{BookWithAuthor, LibraryError, LibraryStore};

pub const MIN_VALID_YEAR: i64 = 1900;
pub const MAX_VALID_YEAR: i64 = 2100;

/// Number of author groups reported in `top_authors`.
pub const TOP_AUTHORS_LIMIT: usize = 5;

/// Minimum number of valid books for a year to count as busy.
pub const BUSY_YEAR_THRESHOLD: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidBook {
    pub id: i64,
    pub title: String,
    pub publication_year: i64,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorRank {
    pub author: String,
    pub book_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookInsights {
    pub valid_books: Vec<ValidBook>,
    pub top_authors: Vec<AuthorRank>,
    /// Year to titles, ascending by year. Serializes as a JSON object.
    pub busy_years: BTreeMap<i64, Vec<String>>,
}

fn as_valid(book: &BookWithAuthor) -> Option<ValidBook> {
    let author = book.author_name.as_ref()?;
    let year = book
        .publication_year
        .filter(|y| (MIN_VALID_YEAR..=MAX_VALID_YEAR).contains(y))?;

    Some(ValidBook {
        id: book.id,
        title: book.title.clone(),
        publication_year: year,
        author: author.clone(),
    })
}

/// Rank authors by valid-book count, descending.
///
/// Groups by author *name*, so distinct authors sharing a name are counted
/// together. Equal counts keep the order in which each name first appeared.
fn rank_authors(valid_books: &[ValidBook]) -> Vec<AuthorRank> {
    let mut ranks: Vec<AuthorRank> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for book in valid_books {
        match index.get(book.author.as_str()) {
            Some(&i) => ranks[i].book_count += 1,
            None => {
                index.insert(book.author.as_str(), ranks.len());
                ranks.push(AuthorRank {
                    author: book.author.clone(),
                    book_count: 1,
                });
            }
        }
    }

    // sort_by is stable
    ranks.sort_by(|a, b| b.book_count.cmp(&a.book_count));
    ranks.truncate(TOP_AUTHORS_LIMIT);
    ranks
}

fn busy_years(valid_books: &[ValidBook]) -> BTreeMap<i64, Vec<String>> {
    let mut by_year: BTreeMap<i64, Vec<String>> = BTreeMap::new();
    for book in valid_books {
        by_year
            .entry(book.publication_year)
            .or_default()
            .push(book.title.clone());
    }
    by_year.retain(|_, titles| titles.len() >= BUSY_YEAR_THRESHOLD);
    by_year
}

/// Compute insights over a snapshot of books.
pub fn compute_insights(books: &[BookWithAuthor]) -> BookInsights {
    let valid_books: Vec<ValidBook> = books.iter().filter_map(as_valid).collect();
    let top_authors = rank_authors(&valid_books);
    let busy_years = busy_years(&valid_books);

    BookInsights {
        valid_books,
        top_authors,
        busy_years,
    }
}

/// Snapshot the store and compute insights over it.
pub fn load_insights<S: LibraryStore + ?Sized>(store: &S) -> Result<BookInsights, LibraryError> {
    let books = store.books_with_authors()?;
    let insights = compute_insights(&books);
    tracing::debug!(
        total = books.len(),
        valid = insights.valid_books.len(),
        busy_years = insights.busy_years.len(),
        "Computed book insights"
    );
    Ok(insights)
}
