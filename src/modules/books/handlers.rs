//! HTTP handlers for the books module.
//!
//! Every handler validates its input, makes the store calls it needs, and maps
//! the outcome to a status code. Errors never leave the handler as anything
//! but an [`AppError`] response.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bookshelf_http::error::AppError;
use serde::Deserialize;
use serde_json::json;

use super::models::{Book, BookFields, BookId, BookPatch};
use super::store::{BookStore, StoreError};
use super::MODULE_NAME;

pub type SharedStore = Arc<dyn BookStore>;

const INVALID_ID_FORMAT: &str = "Invalid ID format";
const INVALID_BOOK_ID: &str = "Invalid book ID";
const INVALID_REQUEST_BODY: &str = "Invalid request body";
const INVALID_REQUEST_PAYLOAD: &str = "Invalid request payload";
const BOOK_NOT_FOUND: &str = "Book not found";

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::not_found(BOOK_NOT_FOUND),
            StoreError::Database(e) => AppError::Internal(e.into()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Case-insensitive substring filter over name, description and author
    pub q: Option<String>,
}

/// `GET /books` and `GET /books?q=term`
pub async fn list_books(
    State(store): State<SharedStore>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Book>>, AppError> {
    let books = match params.q.as_deref() {
        Some(term) if !term.is_empty() => store.find_matching(term).await?,
        _ => store.find_all().await?,
    };

    tracing::debug!(module = MODULE_NAME, count = books.len(), "books listed");
    Ok(Json(books))
}

/// `POST /books`
pub async fn create_book(
    State(store): State<SharedStore>,
    payload: Result<Json<BookFields>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(fields) = payload.map_err(|rejection| reject_body(rejection, INVALID_REQUEST_BODY))?;

    let book = store.create(fields).await?;
    tracing::info!(module = MODULE_NAME, book_id = book.id, "book created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/{}/{}", MODULE_NAME, book.id))],
        message("Book created successfully"),
    ))
}

/// `GET /books/{id}`
pub async fn get_book(
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let id = parse_id(&raw_id, INVALID_ID_FORMAT)?;
    let book = store.find_by_id(id).await?;
    Ok(Json(book))
}

/// `PUT /books/{id}`: every mutable field is replaced, absent ones become empty.
pub async fn update_book(
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
    payload: Result<Json<BookFields>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_id(&raw_id, INVALID_ID_FORMAT)?;
    let mut book = store.find_by_id(id).await?;
    let Json(fields) =
        payload.map_err(|rejection| reject_body(rejection, INVALID_REQUEST_PAYLOAD))?;

    book.overwrite(fields);
    store.save(&book).await?;
    tracing::info!(module = MODULE_NAME, book_id = id, "book updated");

    Ok(message("Book updated successfully"))
}

/// `PATCH /books/{id}`: only fields present in the body are replaced.
pub async fn patch_book(
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
    payload: Result<Json<BookPatch>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_id(&raw_id, INVALID_ID_FORMAT)?;
    let mut book = store.find_by_id(id).await?;
    let Json(patch) =
        payload.map_err(|rejection| reject_body(rejection, INVALID_REQUEST_PAYLOAD))?;

    book.merge(patch);
    store.save(&book).await?;
    tracing::info!(module = MODULE_NAME, book_id = id, "book patched");

    Ok(message("Book updated successfully"))
}

/// `DELETE /books/{id}`
pub async fn delete_book(
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_id(&raw_id, INVALID_BOOK_ID)?;
    let book = store.find_by_id(id).await?;

    store.delete(&book).await?;
    tracing::info!(module = MODULE_NAME, book_id = id, "book deleted");

    Ok(message("Book deleted successfully"))
}

fn parse_id(raw_id: &str, rejection_message: &'static str) -> Result<BookId, AppError> {
    raw_id.parse::<BookId>().map_err(|e| {
        tracing::debug!(module = MODULE_NAME, raw_id, error = %e, "unparseable book id");
        AppError::bad_request(rejection_message)
    })
}

fn reject_body(rejection: JsonRejection, rejection_message: &'static str) -> AppError {
    tracing::debug!(module = MODULE_NAME, error = %rejection.body_text(), "undecodable request body");
    AppError::bad_request(rejection_message)
}

fn message(text: &str) -> Json<serde_json::Value> {
    Json(json!({ "message": text }))
}
