pub mod models;
pub mod routes;
pub mod seed;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use codeshelf_kernel::{settings::CatalogSettings, InitCtx, Module};
use serde_json::json;

use routes::BooksState;
use store::CatalogStore;

/// Books module: owns the catalog store and serves `/api/books`
pub struct BooksModule {
    store: Arc<CatalogStore>,
    strict_not_found: bool,
}

impl BooksModule {
    pub fn new(store: Arc<CatalogStore>, strict_not_found: bool) -> Self {
        Self {
            store,
            strict_not_found,
        }
    }

    /// Build the module from catalog settings, seeding the store if asked to
    pub fn from_settings(settings: &CatalogSettings) -> Self {
        let store = if settings.seed {
            CatalogStore::seeded()
        } else {
            CatalogStore::new()
        };
        Self::new(Arc::new(store), settings.strict_not_found)
    }

    /// Handle on the store backing this module
    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            records = self.store.len(),
            strict_not_found = self.strict_not_found,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(BooksState {
            store: self.store.clone(),
            strict_not_found: self.strict_not_found,
        })
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error_response = json!({
            "description": "Request body could not be parsed",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });
        let ack_response = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Ack" }
                    }
                }
            })
        };
        let body_of = |schema: &str| {
            json!({
                "required": true,
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("#/components/schemas/{schema}") }
                    }
                }
            })
        };

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Every book in the catalog",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Add a book; any id sent is ignored",
                        "tags": ["Books"],
                        "requestBody": body_of("BookDraft"),
                        "responses": {
                            "201": ack_response("Book added"),
                            "500": error_response.clone()
                        }
                    },
                    "put": {
                        "summary": "Replace the fields of the book with the given id",
                        "tags": ["Books"],
                        "requestBody": body_of("Book"),
                        "responses": {
                            "200": ack_response("Book updated, or no book had that id"),
                            "500": error_response.clone()
                        }
                    },
                    "delete": {
                        "summary": "Delete the book with the given id",
                        "tags": ["Books"],
                        "requestBody": body_of("BookRef"),
                        "responses": {
                            "200": ack_response("Book deleted, or no book had that id"),
                            "500": error_response
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": {
                                    "text/plain": { "schema": { "type": "string" } }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "image": { "type": "string", "description": "Cover URL or path" },
                            "available": { "type": "boolean", "default": true }
                        },
                        "required": ["id", "title", "author", "image"]
                    },
                    "BookDraft": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "image": { "type": "string" },
                            "available": { "type": "boolean", "default": true }
                        },
                        "required": ["title", "author", "image"]
                    },
                    "BookRef": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" }
                        },
                        "required": ["id"]
                    },
                    "Ack": {
                        "type": "object",
                        "properties": {
                            "message": { "type": "string" },
                            "book": { "$ref": "#/components/schemas/Book" }
                        },
                        "required": ["message"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            records = self.store.len(),
            "books module stopped, catalog discarded"
        );
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(settings: &CatalogSettings) -> Arc<dyn Module> {
    Arc::new(BooksModule::from_settings(settings))
}
