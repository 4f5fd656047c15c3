//! Client-side mirror of the catalog.
//!
//! Every mutating intent is applied to the local cache before the request is
//! sent. When the server confirms, the cache adopts the record the server
//! returned (re-fetching the list if the answer carries none). When the
//! request fails, the cache is rolled back and the failure is logged. Failures
//! never reach the caller as errors.

use std::fmt::Write as _;

use codeshelf_app::books::models::{Ack, Book, BookId};
use time::OffsetDateTime;

use crate::api::CatalogApi;

/// Whether the form creates a new record or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Create,
    Edit,
}

/// How a mutating intent ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The server accepted the change and the cache reflects its answer
    Confirmed,
    /// The request failed and the cache was restored
    RolledBack,
    /// Nothing to do, no request was sent
    Skipped,
}

fn blank_form() -> Book {
    Book {
        id: 0,
        title: String::new(),
        author: String::new(),
        image: String::new(),
        available: true,
    }
}

/// Millisecond timestamp used as a stand-in id until the server assigns one
fn placeholder_id() -> BookId {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as BookId
}

/// Cache entries displaced by an optimistic write, with their positions
type Snapshot = Vec<(usize, Book)>;

pub struct CatalogView<A> {
    api: A,
    books: Vec<Book>,
    form: Book,
    mode: Mode,
}

impl<A: CatalogApi> CatalogView<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            books: Vec::new(),
            form: blank_form(),
            mode: Mode::Create,
        }
    }

    /// Fetch the full catalog into the cache.
    ///
    /// On failure the error is logged and the cache is left empty.
    pub async fn mount(&mut self) -> Outcome {
        match self.api.list().await {
            Ok(books) => {
                tracing::debug!(count = books.len(), "catalog fetched");
                self.books = books;
                Outcome::Confirmed
            }
            Err(err) => {
                tracing::error!(error = %err, "error fetching books");
                self.books.clear();
                Outcome::RolledBack
            }
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn form(&self) -> &Book {
        &self.form
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.form.author = author.into();
    }

    pub fn set_image(&mut self, image: impl Into<String>) {
        self.form.image = image.into();
    }

    /// Load the cached record `id` into the form and switch to edit mode.
    ///
    /// Returns false, leaving the form alone, if the record is not cached.
    pub fn begin_edit(&mut self, id: BookId) -> bool {
        match self.books.iter().find(|book| book.id == id) {
            Some(book) => {
                self.form = book.clone();
                self.mode = Mode::Edit;
                true
            }
            None => false,
        }
    }

    /// Restore the blank form and create mode
    pub fn cancel_edit(&mut self) {
        self.form = blank_form();
        self.mode = Mode::Create;
    }

    /// Label of the form's submit button
    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            Mode::Create => "Add Book",
            Mode::Edit => "Update Book",
        }
    }

    /// Submit the form: create in create mode, replace in edit mode.
    ///
    /// On success the form is cleared and the mode returns to create. On
    /// failure the form and mode are kept so the user can retry.
    pub async fn save(&mut self) -> Outcome {
        match self.mode {
            Mode::Create => self.save_new().await,
            Mode::Edit => self.save_edit().await,
        }
    }

    async fn save_new(&mut self) -> Outcome {
        let candidate = Book {
            id: self.unused_placeholder(),
            ..self.form.clone()
        };
        self.books.push(candidate.clone());

        match self.api.create(&candidate).await {
            Ok(ack) => {
                self.adopt(candidate.id, ack).await;
                self.form = blank_form();
                Outcome::Confirmed
            }
            Err(err) => {
                tracing::error!(error = %err, "error saving book");
                self.books.retain(|book| book.id != candidate.id);
                Outcome::RolledBack
            }
        }
    }

    async fn save_edit(&mut self) -> Outcome {
        let edited = self.form.clone();
        let snapshot = self.overwrite(&edited);

        match self.api.replace(&edited).await {
            Ok(ack) => {
                self.adopt(edited.id, ack).await;
                self.cancel_edit();
                Outcome::Confirmed
            }
            Err(err) => {
                tracing::error!(error = %err, id = edited.id, "error saving book");
                self.restore(snapshot);
                Outcome::RolledBack
            }
        }
    }

    /// Remove record `id`, locally first.
    pub async fn delete(&mut self, id: BookId) -> Outcome {
        let mut removed: Snapshot = Vec::new();
        let mut position = 0;
        self.books.retain(|book| {
            let keep = book.id != id;
            if !keep {
                removed.push((position, book.clone()));
            }
            position += 1;
            keep
        });

        match self.api.delete(id).await {
            Ok(_) => Outcome::Confirmed,
            Err(err) => {
                tracing::error!(error = %err, id, "error deleting book");
                // Ascending positions put every entry back where it was
                for (position, book) in removed {
                    self.books.insert(position, book);
                }
                Outcome::RolledBack
            }
        }
    }

    /// Flip the availability of cached record `id`.
    ///
    /// Records missing from the cache are skipped without a request.
    pub async fn toggle_availability(&mut self, id: BookId) -> Outcome {
        let Some(current) = self.books.iter().find(|book| book.id == id).cloned() else {
            tracing::debug!(id, "toggle requested for uncached book");
            return Outcome::Skipped;
        };
        let flipped = Book {
            available: !current.available,
            ..current
        };
        let snapshot = self.overwrite(&flipped);

        match self.api.replace(&flipped).await {
            Ok(ack) => {
                self.adopt(id, ack).await;
                Outcome::Confirmed
            }
            Err(err) => {
                tracing::error!(error = %err, id, "error toggling availability");
                self.restore(snapshot);
                Outcome::RolledBack
            }
        }
    }

    /// Plain-text rendering of the form and every cached card
    pub fn render(&self) -> String {
        let mut out = String::from("Code Book Library\n");
        let mode = match self.mode {
            Mode::Create => "new",
            Mode::Edit => "editing",
        };
        let _ = writeln!(
            out,
            "[{mode}] Title: {:?} Author: {:?} Image URL: {:?} <{}>",
            self.form.title,
            self.form.author,
            self.form.image,
            self.submit_label()
        );

        for book in &self.books {
            let toggle = if book.available {
                "Mark Unavailable"
            } else {
                "Mark Available"
            };
            let _ = writeln!(out, "\n#{} {}", book.id, book.title);
            let _ = writeln!(out, "    Author: {}", book.author);
            let _ = writeln!(out, "    Image: {}", book.image);
            let _ = writeln!(out, "    <Delete> <Edit> <{toggle}>");
        }
        out
    }

    /// Replace the cached entry `local_id` with the server's version.
    ///
    /// An acknowledgement without a record leaves the outcome ambiguous, so
    /// the whole list is re-fetched instead.
    async fn adopt(&mut self, local_id: BookId, ack: Ack) {
        let Some(book) = ack.book else {
            self.resync().await;
            return;
        };

        // A stale cache may already hold the server's id elsewhere
        if book.id != local_id {
            self.books.retain(|cached| cached.id != book.id);
        }
        for cached in self.books.iter_mut().filter(|cached| cached.id == local_id) {
            *cached = book.clone();
        }
    }

    async fn resync(&mut self) {
        match self.api.list().await {
            Ok(books) => self.books = books,
            Err(err) => tracing::warn!(error = %err, "could not re-fetch catalog, keeping local copy"),
        }
    }

    fn overwrite(&mut self, book: &Book) -> Snapshot {
        let mut snapshot = Vec::new();
        for (position, cached) in self.books.iter_mut().enumerate() {
            if cached.id == book.id {
                snapshot.push((position, std::mem::replace(cached, book.clone())));
            }
        }
        snapshot
    }

    fn restore(&mut self, snapshot: Snapshot) {
        for (position, book) in snapshot {
            self.books[position] = book;
        }
    }

    fn unused_placeholder(&self) -> BookId {
        let mut id = placeholder_id();
        while self.books.iter().any(|book| book.id == id) {
            id += 1;
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use async_trait::async_trait;
    use codeshelf_app::books::models::{BookDraft, BookPatch};
    use codeshelf_app::books::store::CatalogStore;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// In-process catalog backed by the real store
    #[derive(Default)]
    struct FakeCatalog {
        store: CatalogStore,
        offline: AtomicBool,
        terse_acks: AtomicBool,
    }

    impl FakeCatalog {
        fn seeded() -> Arc<Self> {
            Arc::new(Self {
                store: CatalogStore::seeded(),
                ..Self::default()
            })
        }

        fn check(&self) -> Result<(), ClientError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(ClientError::rejected(503, "offline"));
            }
            Ok(())
        }

        fn ack(&self, message: &str, book: Option<Book>) -> Ack {
            if self.terse_acks.load(Ordering::SeqCst) {
                Ack::new(message)
            } else {
                Ack::with_book(message, book)
            }
        }
    }

    #[async_trait]
    impl CatalogApi for FakeCatalog {
        async fn list(&self) -> Result<Vec<Book>, ClientError> {
            self.check()?;
            Ok(self.store.list())
        }

        async fn create(&self, book: &Book) -> Result<Ack, ClientError> {
            self.check()?;
            let created = self.store.create(BookDraft::from(book.clone()));
            Ok(self.ack("added", Some(created)))
        }

        async fn replace(&self, book: &Book) -> Result<Ack, ClientError> {
            self.check()?;
            let updated = self.store.replace(&BookPatch::from(book.clone()));
            Ok(self.ack("updated", updated))
        }

        async fn delete(&self, id: BookId) -> Result<Ack, ClientError> {
            self.check()?;
            self.store.delete(id);
            Ok(Ack::new("deleted"))
        }
    }

    async fn mounted(api: &Arc<FakeCatalog>) -> CatalogView<Arc<FakeCatalog>> {
        let mut view = CatalogView::new(api.clone());
        assert_eq!(view.mount().await, Outcome::Confirmed);
        view
    }

    fn fill(view: &mut CatalogView<Arc<FakeCatalog>>) {
        view.set_title("X");
        view.set_author("Y");
        view.set_image("/z.jpg");
    }

    #[tokio::test]
    async fn mount_failure_leaves_cache_empty() {
        let api = FakeCatalog::seeded();
        api.offline.store(true, Ordering::SeqCst);

        let mut view = CatalogView::new(api.clone());
        assert_eq!(view.mount().await, Outcome::RolledBack);
        assert!(view.books().is_empty());
    }

    #[tokio::test]
    async fn create_adopts_server_assigned_id() {
        let api = FakeCatalog::seeded();
        let mut view = mounted(&api).await;
        fill(&mut view);

        assert_eq!(view.save().await, Outcome::Confirmed);

        let last = view.books().last().unwrap();
        assert_eq!(last.id, 10);
        assert_eq!(last.title, "X");
        assert!(last.available);
        assert_eq!(view.books(), api.store.list().as_slice());
        assert_eq!(view.form(), &blank_form());
    }

    #[tokio::test]
    async fn create_with_terse_ack_resyncs_from_server() {
        let api = FakeCatalog::seeded();
        api.terse_acks.store(true, Ordering::SeqCst);
        let mut view = mounted(&api).await;
        fill(&mut view);

        assert_eq!(view.save().await, Outcome::Confirmed);
        assert_eq!(view.books(), api.store.list().as_slice());
        assert_eq!(view.books().len(), 10);
    }

    #[tokio::test]
    async fn failed_create_rolls_back_and_keeps_form() {
        let api = FakeCatalog::seeded();
        let mut view = mounted(&api).await;
        fill(&mut view);
        api.offline.store(true, Ordering::SeqCst);

        assert_eq!(view.save().await, Outcome::RolledBack);
        assert_eq!(view.books().len(), 9);
        assert_eq!(view.form().title, "X");
        assert_eq!(api.store.len(), 9);
    }

    #[tokio::test]
    async fn edit_then_save_replaces_record_and_resets_mode() {
        let api = FakeCatalog::seeded();
        let mut view = mounted(&api).await;

        assert!(view.begin_edit(6));
        assert_eq!(view.mode(), Mode::Edit);
        assert_eq!(view.submit_label(), "Update Book");
        assert_eq!(view.form().author, "David Thomas");

        view.set_title("The Pragmatic Programmer");
        assert_eq!(view.save().await, Outcome::Confirmed);

        assert_eq!(view.mode(), Mode::Create);
        assert_eq!(view.submit_label(), "Add Book");
        assert_eq!(view.books()[5].title, "The Pragmatic Programmer");
        assert_eq!(view.books(), api.store.list().as_slice());
    }

    #[tokio::test]
    async fn failed_edit_restores_cached_record() {
        let api = FakeCatalog::seeded();
        let mut view = mounted(&api).await;
        let original = view.books()[0].clone();

        view.begin_edit(original.id);
        view.set_author("Someone Else");
        api.offline.store(true, Ordering::SeqCst);

        assert_eq!(view.save().await, Outcome::RolledBack);
        assert_eq!(view.books()[0], original);
        assert_eq!(view.mode(), Mode::Edit);
        assert_eq!(view.form().author, "Someone Else");
    }

    #[tokio::test]
    async fn edit_of_record_gone_from_server_drops_it_locally() {
        let api = FakeCatalog::seeded();
        let mut view = mounted(&api).await;
        api.store.delete(3);

        view.begin_edit(3);
        view.set_title("Stale edit");
        assert_eq!(view.save().await, Outcome::Confirmed);

        assert!(view.books().iter().all(|b| b.id != 3));
        assert_eq!(view.books().len(), 8);
    }

    #[tokio::test]
    async fn cancel_edit_restores_blank_form() {
        let api = FakeCatalog::seeded();
        let mut view = mounted(&api).await;

        view.begin_edit(2);
        view.cancel_edit();

        assert_eq!(view.mode(), Mode::Create);
        assert_eq!(view.form(), &blank_form());
        assert!(!view.begin_edit(404));
        assert_eq!(view.mode(), Mode::Create);
    }

    #[tokio::test]
    async fn delete_is_optimistic_and_rolls_back_in_place() {
        let api = FakeCatalog::seeded();
        let mut view = mounted(&api).await;

        api.offline.store(true, Ordering::SeqCst);
        let before = view.books().to_vec();
        assert_eq!(view.delete(4).await, Outcome::RolledBack);
        assert_eq!(view.books(), before.as_slice());

        api.offline.store(false, Ordering::SeqCst);
        assert_eq!(view.delete(4).await, Outcome::Confirmed);
        assert_eq!(view.books().len(), 8);
        assert!(view.books().iter().all(|b| b.id != 4));
        assert_eq!(view.books(), api.store.list().as_slice());
    }

    #[tokio::test]
    async fn toggle_flips_and_confirms() {
        let api = FakeCatalog::seeded();
        let mut view = mounted(&api).await;

        assert_eq!(view.toggle_availability(7).await, Outcome::Confirmed);
        assert!(!view.books()[6].available);
        assert!(!api.store.list()[6].available);
        assert!(view.render().contains("<Mark Available>"));

        assert_eq!(view.toggle_availability(7).await, Outcome::Confirmed);
        assert!(view.books()[6].available);
    }

    #[tokio::test]
    async fn toggle_failure_restores_and_unknown_id_skips() {
        let api = FakeCatalog::seeded();
        let mut view = mounted(&api).await;

        api.offline.store(true, Ordering::SeqCst);
        assert_eq!(view.toggle_availability(1).await, Outcome::RolledBack);
        assert!(view.books()[0].available);

        assert_eq!(view.toggle_availability(1234).await, Outcome::Skipped);
    }

    #[test]
    fn placeholder_ids_do_not_collide_with_cache() {
        let api = FakeCatalog::seeded();
        let mut view = CatalogView::new(api);
        let taken = placeholder_id();
        view.books.push(Book {
            id: taken,
            ..blank_form()
        });

        assert!(view.unused_placeholder() > taken);
    }

    #[test]
    fn render_lists_cards_and_form() {
        let api = FakeCatalog::seeded();
        let mut view = CatalogView::new(api);
        view.books = vec![Book {
            id: 1,
            title: "Programming Rust".to_string(),
            author: "Jim Blandy".to_string(),
            image: "/pr.jpg".to_string(),
            available: true,
        }];

        let text = view.render();
        assert!(text.starts_with("Code Book Library\n"));
        assert!(text.contains("<Add Book>"));
        assert!(text.contains("#1 Programming Rust"));
        assert!(text.contains("Author: Jim Blandy"));
        assert!(text.contains("<Mark Unavailable>"));
    }
}
