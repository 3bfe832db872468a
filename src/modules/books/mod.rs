pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use handlers::SharedStore;

pub(crate) const MODULE_NAME: &str = "books";

/// Books module: catalog CRUD over a [`store::BookStore`]
pub struct BooksModule {
    store: SharedStore,
}

impl BooksModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(Arc::clone(&self.store))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error_response = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let message_response = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/MessageResponse" }
                    }
                }
            })
        };
        let id_parameter = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books, optionally filtered by a search term",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "q",
                            "in": "query",
                            "required": false,
                            "description": "Case-insensitive substring of name, description or author",
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": {
                                "description": "List of books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "500": error_response("Internal server error")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookFields" }
                                }
                            }
                        },
                        "responses": {
                            "201": message_response("Book created; Location holds its URL"),
                            "400": error_response("Malformed body"),
                            "500": error_response("Internal server error")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [id_parameter.clone()],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "400": error_response("Invalid ID format"),
                            "404": error_response("Book not found"),
                            "500": error_response("Internal server error")
                        }
                    },
                    "put": {
                        "summary": "Replace every field of a book",
                        "tags": ["Books"],
                        "parameters": [id_parameter.clone()],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookFields" }
                                }
                            }
                        },
                        "responses": {
                            "200": message_response("Book updated"),
                            "400": error_response("Invalid ID format or malformed body"),
                            "404": error_response("Book not found"),
                            "500": error_response("Internal server error")
                        }
                    },
                    "patch": {
                        "summary": "Replace only the supplied fields of a book",
                        "tags": ["Books"],
                        "parameters": [id_parameter.clone()],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookPatch" }
                                }
                            }
                        },
                        "responses": {
                            "200": message_response("Book updated"),
                            "400": error_response("Invalid ID format or malformed body"),
                            "404": error_response("Book not found"),
                            "500": error_response("Internal server error")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [id_parameter],
                        "responses": {
                            "200": message_response("Book deleted"),
                            "400": error_response("Invalid book ID"),
                            "404": error_response("Book not found"),
                            "500": error_response("Internal server error")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "Store-assigned identifier"
                            },
                            "name": { "type": "string" },
                            "description": { "type": "string" },
                            "author": { "type": "string" }
                        },
                        "required": ["id", "name", "description", "author"]
                    },
                    "BookFields": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "description": { "type": "string" },
                            "author": { "type": "string" }
                        }
                    },
                    "BookPatch": {
                        "type": "object",
                        "description": "Only the fields present are replaced",
                        "properties": {
                            "name": { "type": ["string", "null"] },
                            "description": { "type": ["string", "null"] },
                            "author": { "type": ["string", "null"] }
                        }
                    },
                    "MessageResponse": {
                        "type": "object",
                        "properties": {
                            "message": { "type": "string" }
                        },
                        "required": ["message"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id          BIGSERIAL PRIMARY KEY,
                    name        TEXT NOT NULL DEFAULT '',
                    description TEXT NOT NULL DEFAULT '',
                    author      TEXT NOT NULL DEFAULT ''
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module backed by `store`
pub fn create_module(store: SharedStore) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::memory::MemoryBookStore;

    fn module() -> BooksModule {
        BooksModule::new(Arc::new(MemoryBookStore::default()))
    }

    #[test]
    fn module_is_mounted_as_books() {
        assert_eq!(module().name(), "books");
    }

    #[test]
    fn migration_creates_books_table_idempotently() {
        let migrations = module().migrations();
        assert_eq!(migrations.len(), 1);
        assert!(migrations[0].up.contains("CREATE TABLE IF NOT EXISTS books"));
    }

    #[test]
    fn openapi_fragment_is_mounted_under_books() {
        let mut registry = bookshelf_kernel::ModuleRegistry::new();
        registry.register(create_module(Arc::new(MemoryBookStore::default()))).unwrap();

        let spec = bookshelf_http::router::merged_openapi(&registry);
        assert!(spec["paths"]["/books"]["post"].is_object());
        assert!(spec["paths"]["/books/{id}"]["delete"].is_object());
        assert!(spec["components"]["schemas"]["Book"].is_object());
    }

    #[test]
    fn patch_body_is_described_by_its_own_schema() {
        let spec = module().openapi().unwrap();
        let patch_body =
            &spec["paths"]["/{id}"]["patch"]["requestBody"]["content"]["application/json"];
        assert_eq!(patch_body["schema"]["$ref"], "#/components/schemas/BookPatch");

        let patch_schema = &spec["components"]["schemas"]["BookPatch"];
        assert!(patch_schema["properties"]["author"].is_object());
        assert!(patch_schema.get("required").is_none());
    }
}
