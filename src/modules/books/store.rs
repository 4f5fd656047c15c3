//! In-memory catalog store.
//!
//! The store lives from process start to process end and is shared between
//! request handlers through an `Arc`. Every operation holds the lock for its
//! whole read-modify-write, so `max + 1` id assignment cannot hand out the
//! same id twice.

use parking_lot::RwLock;

use super::models::{Book, BookDraft, BookId, BookPatch};
use super::seed::seed_books;

/// Authoritative, process-lifetime set of book records.
#[derive(Debug, Default)]
pub struct CatalogStore {
    books: RwLock<Vec<Book>>,
}

impl CatalogStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the built-in seed records.
    pub fn seeded() -> Self {
        Self::with_books(seed_books())
    }

    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: RwLock::new(books),
        }
    }

    /// Every record, in insertion order.
    pub fn list(&self) -> Vec<Book> {
        self.books.read().clone()
    }

    pub fn len(&self) -> usize {
        self.books.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.read().is_empty()
    }

    /// Append a record under a freshly assigned id and return it.
    pub fn create(&self, draft: BookDraft) -> Book {
        let mut books = self.books.write();
        let id = next_id(&books);
        let book = draft.into_book(id);
        books.push(book.clone());
        tracing::info!(id, title = %book.title, "book added");
        book
    }

    /// Apply `patch` to every record with its id.
    ///
    /// Returns the updated record, or `None` when no record matched.
    pub fn replace(&self, patch: &BookPatch) -> Option<Book> {
        let mut books = self.books.write();
        let mut updated = None;
        for book in books.iter_mut().filter(|book| patch.matches(book)) {
            patch.apply_to(book);
            updated = Some(book.clone());
        }
        match &updated {
            Some(_) => tracing::info!(id = ?patch.id, "book updated"),
            None => tracing::debug!(id = ?patch.id, "no book to update"),
        }
        updated
    }

    /// Remove every record with `id`, returning how many went.
    pub fn delete(&self, id: BookId) -> usize {
        let mut books = self.books.write();
        let before = books.len();
        books.retain(|book| book.id != id);
        let removed = before - books.len();
        tracing::info!(id, removed, "book deleted");
        removed
    }
}

fn next_id(books: &[Book]) -> BookId {
    books.iter().map(|book| book.id).max().map_or(1, |max| max + 1)
}
