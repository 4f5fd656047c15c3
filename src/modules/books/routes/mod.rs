//! HTTP handlers for the `/api/books` resource.
//!
//! Bodies are read as raw bytes and parsed here so that an unparseable body,
//! whatever its content-type, surfaces as the resource's own error message.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use codeshelf_http::error::AppError;
use serde::de::DeserializeOwned;

use super::models::{Ack, Book, BookDraft, BookPatch, BookRef};
use super::store::CatalogStore;

pub const ADDED: &str = "Book added successfully!";
pub const UPDATED: &str = "Book updated successfully!";
pub const DELETED: &str = "Book deleted successfully!";
pub const ADD_FAILED: &str = "Error adding book!";
pub const UPDATE_FAILED: &str = "Error updating book!";
pub const DELETE_FAILED: &str = "Error deleting book!";
pub const NOT_FOUND: &str = "Book not found!";

/// Shared state injected into every books handler
#[derive(Clone)]
pub struct BooksState {
    pub store: Arc<CatalogStore>,
    /// Report replace/delete of an unknown id as 404 rather than success
    pub strict_not_found: bool,
}

/// Routes for the books module, relative to its mount point
pub fn router(state: BooksState) -> Router {
    Router::new()
        .route(
            "/",
            get(list_books)
                .post(create_book)
                .put(replace_book)
                .delete(delete_book),
        )
        .route("/health", get(health_check))
        .with_state(state)
}

fn parse_body<T: DeserializeOwned>(body: &Bytes, failure: &str) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|err| AppError::malformed(failure, err))
}

/// Health check endpoint
async fn health_check(State(state): State<BooksState>) -> String {
    format!("books module is healthy ({} records)", state.store.len())
}

async fn list_books(State(state): State<BooksState>) -> Json<Vec<Book>> {
    Json(state.store.list())
}

async fn create_book(
    State(state): State<BooksState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Ack>), AppError> {
    let draft: BookDraft = parse_body(&body, ADD_FAILED)?;
    let book = state.store.create(draft);
    Ok((StatusCode::CREATED, Json(Ack::with_book(ADDED, Some(book)))))
}

async fn replace_book(
    State(state): State<BooksState>,
    body: Bytes,
) -> Result<Json<Ack>, AppError> {
    let patch: BookPatch = parse_body(&body, UPDATE_FAILED)?;
    let updated = state.store.replace(&patch);
    if updated.is_none() && state.strict_not_found {
        return Err(AppError::not_found(NOT_FOUND));
    }
    Ok(Json(Ack::with_book(UPDATED, updated)))
}

async fn delete_book(
    State(state): State<BooksState>,
    body: Bytes,
) -> Result<Json<Ack>, AppError> {
    let target: BookRef = parse_body(&body, DELETE_FAILED)?;
    let removed = state.store.delete(target.id);
    if removed == 0 && state.strict_not_found {
        return Err(AppError::not_found(NOT_FOUND));
    }
    Ok(Json(Ack::new(DELETED)))
}
