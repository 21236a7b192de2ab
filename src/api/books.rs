//! Book API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::error::ApiResult;
use crate::domain::BookFilter;
use crate::infrastructure::AppState;
use crate::services::book_service::{self, BookInput};

#[derive(Debug, Default, Deserialize)]
pub struct ListBooksQuery {
    /// Restrict to books with a copy on the shelf (the issue form's selector)
    pub available_only: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/books",
    params(("available_only" = Option<bool>, Query, description = "Only books with available copies")),
    responses((status = 200, description = "Books ordered by title"))
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<ListBooksQuery>,
) -> ApiResult<Json<Value>> {
    let filter = BookFilter {
        available_only: query.available_only.unwrap_or(false),
    };
    let books = book_service::list_books(&state, filter).await?;

    Ok(Json(json!({
        "books": books,
        "total": books.len()
    })))
}

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book found"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<Value>> {
    let book = book_service::get_book(&state, id).await?;
    Ok(Json(json!({ "book": book })))
}

#[utoipa::path(
    post,
    path = "/api/books",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created, fully available"),
        (status = 400, description = "Missing field or quantity below 1")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(payload): Json<BookInput>,
) -> ApiResult<impl IntoResponse> {
    let book = book_service::create_book(&state, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "book": book,
            "message": "Book added successfully"
        })),
    ))
}

#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Quantity below the copies currently borrowed")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<BookInput>,
) -> ApiResult<Json<Value>> {
    let book = book_service::update_book(&state, id, payload).await?;

    Ok(Json(json!({
        "book": book,
        "message": "Book updated successfully"
    })))
}

#[utoipa::path(
    post,
    path = "/api/books/{id}/reconcile",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Availability recomputed from outstanding issuances"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn reconcile_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let book = book_service::reconcile_book(&state, id).await?;

    Ok(Json(json!({
        "book": book,
        "message": "Book stock reconciled"
    })))
}
