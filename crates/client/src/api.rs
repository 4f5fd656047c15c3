use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use codeshelf_app::books::models::{Ack, Book, BookId, BookRef};
use serde::{de::DeserializeOwned, Deserialize};

use crate::error::ClientError;

/// Path of the books resource on a catalog server
pub const BOOKS_PATH: &str = "/api/books";

/// The four operations a catalog server offers
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Book>, ClientError>;

    /// Submit `book` for creation; the server picks the id
    async fn create(&self, book: &Book) -> Result<Ack, ClientError>;

    /// Replace the fields of the record with `book.id`
    async fn replace(&self, book: &Book) -> Result<Ack, ClientError>;

    async fn delete(&self, id: BookId) -> Result<Ack, ClientError>;
}

#[async_trait]
impl<T: CatalogApi + ?Sized> CatalogApi for Arc<T> {
    async fn list(&self) -> Result<Vec<Book>, ClientError> {
        (**self).list().await
    }

    async fn create(&self, book: &Book) -> Result<Ack, ClientError> {
        (**self).create(book).await
    }

    async fn replace(&self, book: &Book) -> Result<Ack, ClientError> {
        (**self).replace(book).await
    }

    async fn delete(&self, id: BookId) -> Result<Ack, ClientError> {
        (**self).delete(id).await
    }
}

/// [`CatalogApi`] over HTTP with JSON bodies
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct Rejection {
    message: String,
}

impl HttpCatalog {
    /// Client for the server at `base_url`, e.g. `http://127.0.0.1:3000`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), BOOKS_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = match response.json::<Rejection>().await {
        Ok(rejection) => rejection.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    };
    Err(ClientError::rejected(status.as_u16(), message))
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn list(&self) -> Result<Vec<Book>, ClientError> {
        let response = self.client.get(&self.endpoint).send().await?;
        decode(response).await
    }

    async fn create(&self, book: &Book) -> Result<Ack, ClientError> {
        let response = self.client.post(&self.endpoint).json(book).send().await?;
        decode(response).await
    }

    async fn replace(&self, book: &Book) -> Result<Ack, ClientError> {
        let response = self.client.put(&self.endpoint).json(book).send().await?;
        decode(response).await
    }

    async fn delete(&self, id: BookId) -> Result<Ack, ClientError> {
        let response = self
            .client
            .delete(&self.endpoint)
            .json(&BookRef { id })
            .send()
            .await?;
        decode(response).await
    }
}
