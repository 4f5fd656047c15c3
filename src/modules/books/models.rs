use serde::{de, Deserialize, Deserializer, Serialize};

/// Store-assigned identifier of a book.
pub type BookId = i64;

/// An id as it may arrive over the wire: JSON does not tell `4` from `4.0`.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Integer(i64),
    Float(f64),
}

impl WireId {
    fn into_id<E: de::Error>(self) -> Result<BookId, E> {
        match self {
            WireId::Integer(id) => Ok(id),
            WireId::Float(value)
                if value.fract() == 0.0
                    && value >= i64::MIN as f64
                    && value < i64::MAX as f64 =>
            {
                Ok(value as BookId)
            }
            WireId::Float(value) => Err(E::custom(format!(
                "invalid id {value}, expected an integral number"
            ))),
        }
    }
}

fn integral_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BookId, D::Error> {
    WireId::deserialize(deserializer)?.into_id()
}

fn optional_integral_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<BookId>, D::Error> {
    Option::<WireId>::deserialize(deserializer)?
        .map(WireId::into_id)
        .transpose()
}

fn default_available() -> bool {
    true
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier, assigned by the store
    pub id: BookId,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Cover image URL or path, never validated
    pub image: String,
    /// Whether the book can currently be borrowed
    #[serde(default = "default_available")]
    pub available: bool,
}

/// Request model for creating a new book.
///
/// Any `id` the caller sends is ignored; the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub image: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

impl BookDraft {
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            image: self.image,
            available: self.available,
        }
    }
}

impl From<Book> for BookDraft {
    fn from(book: Book) -> Self {
        Self {
            title: book.title,
            author: book.author,
            image: book.image,
            available: book.available,
        }
    }
}

/// Request model for replacing a book, keyed on `id`.
///
/// Fields left out of the request keep their stored value. A patch without
/// an id matches no record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(
        default,
        deserialize_with = "optional_integral_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<BookId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl BookPatch {
    pub fn matches(&self, book: &Book) -> bool {
        self.id == Some(book.id)
    }

    /// Overwrite the fields of `book` that this patch carries.
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title.clone_from(title);
        }
        if let Some(author) = &self.author {
            book.author.clone_from(author);
        }
        if let Some(image) = &self.image {
            book.image.clone_from(image);
        }
        if let Some(available) = self.available {
            book.available = available;
        }
    }
}

impl From<Book> for BookPatch {
    fn from(book: Book) -> Self {
        Self {
            id: Some(book.id),
            title: Some(book.title),
            author: Some(book.author),
            image: Some(book.image),
            available: Some(book.available),
        }
    }
}

/// Request model for deleting a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRef {
    #[serde(deserialize_with = "integral_id")]
    pub id: BookId,
}

/// Acknowledgement returned by every mutating endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
    /// The record as the store now holds it, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<Book>,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            book: None,
        }
    }

    pub fn with_book(message: impl Into<String>, book: Option<Book>) -> Self {
        Self {
            message: message.into(),
            book,
        }
    }
}
