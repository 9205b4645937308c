use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use usedbook_db::{Book, BookStore, InMemoryBookStore};
use usedbook_kernel::settings::Settings;

struct TestApp {
    router: Router,
    store: Arc<InMemoryBookStore>,
}

impl TestApp {
    fn spawn() -> Self {
        let store = Arc::new(InMemoryBookStore::new());
        let registry = usedbook_app::build_registry(store.clone());
        let router = usedbook_http::build_router(&registry, &Settings::default());
        Self { router, store }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn post(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::post(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn post_json(&self, uri: &str, payload: Value) -> (StatusCode, Value) {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn books(&self) -> Vec<Book> {
        let (status, body) = self
            .send(Request::get("/books").body(Body::empty()).unwrap())
            .await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_value(body).unwrap()
    }
}

fn clean_code() -> Value {
    json!({
        "isbn": "978-0-13-468599-1",
        "title": "Clean Code",
        "author": "R. Martin",
        "edition": "1st",
        "price": 45.0
    })
}

#[tokio::test]
async fn empty_inventory_lists_nothing() {
    let app = TestApp::spawn();
    assert!(app.books().await.is_empty());
}

#[tokio::test]
async fn selling_a_new_book_returns_created_with_price() {
    let app = TestApp::spawn();

    let (status, body) = app.post_json("/books/sell", clean_code()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"status": "success", "price": 45.0}));

    let books = app.books().await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].isbn, "978-0-13-468599-1");
    assert_eq!(books[0].author.as_deref(), Some("R. Martin"));
}

#[tokio::test]
async fn invalid_listing_is_a_bad_request_with_field_details() {
    let app = TestApp::spawn();

    let (status, body) = app
        .post_json("/books/sell", json!({"isbn": "", "title": "Dune", "price": -3.0}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["isbn", "price"]);
    assert!(app.store.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::spawn();

    let (status, body) = app
        .send(
            Request::post("/books/sell")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn reselling_by_id_adds_a_depreciated_copy() {
    let app = TestApp::spawn();
    app.post_json("/books/sell", clean_code()).await;
    let original = app.books().await.remove(0);

    let (status, body) = app.post(&format!("/books/sell/{}", original.id)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert!((body["price"].as_f64().unwrap() - 40.5).abs() < 1e-9);

    let books = app.books().await;
    assert_eq!(books.len(), 2);
    assert!(books.contains(&original));
}

#[tokio::test]
async fn reselling_by_isbn_adds_a_depreciated_copy() {
    let app = TestApp::spawn();
    app.post_json("/books/sell", clean_code()).await;

    let (status, body) = app.post("/books/sell/isbn/978-0-13-468599-1").await;

    assert_eq!(status, StatusCode::CREATED);
    assert!((body["price"].as_f64().unwrap() - 40.5).abs() < 1e-9);
    assert_eq!(app.books().await.len(), 2);
}

#[tokio::test]
async fn buying_removes_the_copy() {
    let app = TestApp::spawn();
    app.post_json("/books/sell", clean_code()).await;
    let id = app.books().await.remove(0).id;

    let (status, body) = app.post(&format!("/books/buy/{}", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "id": id}));
    assert!(app.books().await.is_empty());
}

#[tokio::test]
async fn unknown_ids_and_isbns_are_not_found() {
    let app = TestApp::spawn();
    app.post_json("/books/sell", clean_code()).await;

    for uri in [
        "/books/buy/unknown-id",
        "/books/sell/unknown-id",
        "/books/sell/isbn/000",
    ] {
        let (status, body) = app.post(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"]["code"], "not_found");
    }

    assert_eq!(app.books().await.len(), 1);
}

#[tokio::test]
async fn openapi_lists_book_paths() {
    let app = TestApp::spawn();

    let (status, spec) = app
        .send(Request::get("/docs/openapi.json").body(Body::empty()).unwrap())
        .await;

    assert_eq!(status, StatusCode::OK);
    for path in ["/books", "/books/sell", "/books/buy/{id}", "/books/sell/isbn/{isbn}"] {
        assert!(spec["paths"][path].is_object(), "{path}");
    }
    assert!(spec["components"]["schemas"]["Book"].is_object());
}

#[test]
fn swagger_document_includes_book_paths() {
    let registry = usedbook_app::build_registry(Arc::new(InMemoryBookStore::new()));

    let openapi: utoipa::openapi::OpenApi =
        serde_json::from_value(usedbook_http::router::merged_openapi(&registry)).unwrap();

    for path in ["/books", "/books/sell", "/books/buy/{id}", "/books/sell/{id}"] {
        assert!(openapi.paths.paths.contains_key(path), "{path}");
    }
    let schemas = &openapi.components.as_ref().unwrap().schemas;
    assert!(schemas.contains_key("NewListing"));
}
