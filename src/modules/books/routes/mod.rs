use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use usedbook_http::error::AppError;

use super::models::{Book, NewListing, PurchaseReceipt, SaleReceipt};
use super::service::{BookError, BookService};

/// HTTP routes for the Books module, relative to its mount path.
pub fn router(service: BookService) -> Router {
    tracing::debug!(target: "usedbook.routes", "registering book routes");

    Router::new()
        .route("/", get(list_books))
        .route("/health", get(health_check))
        .route("/sell", post(sell_new_book))
        .route("/buy/{id}", post(buy_book))
        .route("/sell/{id}", post(sell_book))
        .route("/sell/isbn/{isbn}", post(sell_book_by_isbn))
        .with_state(service)
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::NotFound(message) => AppError::not_found(message),
            BookError::InvalidOperation(message) => AppError::bad_request(message),
            BookError::Store(source) => AppError::Internal(source.into()),
        }
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(State(service): State<BookService>) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(service.get_available_books().await?))
}

async fn sell_new_book(
    State(service): State<BookService>,
    payload: Result<Json<NewListing>, JsonRejection>,
) -> Result<(StatusCode, Json<SaleReceipt>), AppError> {
    let Json(listing) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    let violations = listing.violations();
    if !violations.is_empty() {
        let details = violations
            .iter()
            .map(|violation| serde_json::json!(violation))
            .collect();
        return Err(AppError::validation(details, "Invalid book data provided."));
    }

    let price = service.sell_new_book(listing).await?;
    Ok((StatusCode::CREATED, Json(SaleReceipt::success(price))))
}

async fn buy_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<Json<PurchaseReceipt>, AppError> {
    service.buy_book(&id).await?;
    Ok(Json(PurchaseReceipt::success(id)))
}

async fn sell_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<SaleReceipt>), AppError> {
    let price = service.sell_book(&id).await?;
    Ok((StatusCode::CREATED, Json(SaleReceipt::success(price))))
}

async fn sell_book_by_isbn(
    State(service): State<BookService>,
    Path(isbn): Path<String>,
) -> Result<(StatusCode, Json<SaleReceipt>), AppError> {
    let price = service.sell_book_by_isbn(&isbn).await?;
    Ok((StatusCode::CREATED, Json(SaleReceipt::success(price))))
}
