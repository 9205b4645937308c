pub mod models;
pub mod pricing;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use usedbook_db::BookStore;
use usedbook_kernel::{InitCtx, Module};

use service::BookService;

/// Books module: the inventory of used books and its buy/sell operations
pub struct BooksModule {
    service: BookService,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self {
            service: BookService::new(store),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let in_stock = self.service.get_available_books().await?.len();
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            in_stock,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let sale_created = json!({
            "description": "Copy listed for sale",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/SaleReceipt" }
                }
            }
        });
        let path_param = |name: &str, description: &str| {
            json!({
                "name": name,
                "in": "path",
                "required": true,
                "description": description,
                "schema": { "type": "string" }
            })
        };

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List available books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Every copy in stock",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "500": error("Internal server error")
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
                },
                "/sell": {
                    "post": {
                        "summary": "List a new book for sale",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/NewListing" }
                                }
                            }
                        },
                        "responses": {
                            "201": sale_created.clone(),
                            "400": error("Invalid book data")
                        }
                    }
                },
                "/buy/{id}": {
                    "post": {
                        "summary": "Buy a copy, removing it from stock",
                        "tags": ["Books"],
                        "parameters": [path_param("id", "Copy identifier")],
                        "responses": {
                            "200": {
                                "description": "Copy bought",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/PurchaseReceipt" }
                                    }
                                }
                            },
                            "404": error("No copy with that id")
                        }
                    }
                },
                "/sell/{id}": {
                    "post": {
                        "summary": "Resell a copy at a depreciated price",
                        "tags": ["Books"],
                        "parameters": [path_param("id", "Copy identifier")],
                        "responses": {
                            "201": sale_created.clone(),
                            "404": error("No copy with that id")
                        }
                    }
                },
                "/sell/isbn/{isbn}": {
                    "post": {
                        "summary": "Resell a copy located by ISBN at a depreciated price",
                        "tags": ["Books"],
                        "parameters": [path_param("isbn", "ISBN of the book")],
                        "responses": {
                            "201": sale_created,
                            "404": error("No copy with that ISBN")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "description": "Unique identifier for the copy" },
                            "isbn": { "type": "string" },
                            "title": { "type": "string" },
                            "author": { "type": ["string", "null"] },
                            "edition": { "type": ["string", "null"] },
                            "price": { "type": "number", "format": "double" }
                        },
                        "required": ["id", "isbn", "title", "price"]
                    },
                    "NewListing": {
                        "type": "object",
                        "properties": {
                            "isbn": { "type": "string", "description": "Must not be blank" },
                            "title": { "type": "string", "description": "Must not be blank" },
                            "author": { "type": ["string", "null"] },
                            "edition": { "type": ["string", "null"] },
                            "price": { "type": "number", "format": "double", "description": "Must be positive" }
                        },
                        "required": ["isbn", "title", "price"]
                    },
                    "SaleReceipt": {
                        "type": "object",
                        "properties": {
                            "status": { "type": "string" },
                            "price": { "type": "number", "format": "double" }
                        },
                        "required": ["status", "price"]
                    },
                    "PurchaseReceipt": {
                        "type": "object",
                        "properties": {
                            "status": { "type": "string" },
                            "id": { "type": "string" }
                        },
                        "required": ["status", "id"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create the books module over `store`
pub fn create_module(store: Arc<dyn BookStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
