//! Client side of the book catalog.
//!
//! [`HttpCatalog`] speaks the `/api/books` protocol; [`CatalogView`] keeps a
//! local copy of the catalog, applies user intents to it optimistically and
//! reconciles with the server's answer.

pub mod api;
pub mod error;
pub mod view;

pub use api::{CatalogApi, HttpCatalog, BOOKS_PATH};
pub use codeshelf_app::books::models::{Ack, Book, BookId};
pub use error::ClientError;
pub use view::{CatalogView, Mode, Outcome};
