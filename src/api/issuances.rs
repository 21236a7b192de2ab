//! Issuance API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::error::ApiResult;
use crate::domain::IssuanceFilter;
use crate::infrastructure::AppState;
use crate::services::issuance_service::{self, IssueRequest};

#[derive(Debug, Default, Deserialize)]
pub struct ListIssuancesQuery {
    pub outstanding_only: Option<bool>,
    pub member_id: Option<i32>,
    pub book_id: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/issuances",
    params(
        ("outstanding_only" = Option<bool>, Query, description = "Only issuances not yet returned"),
        ("member_id" = Option<i32>, Query, description = "Filter by member"),
        ("book_id" = Option<i32>, Query, description = "Filter by book")
    ),
    responses((status = 200, description = "Issuances, newest first, with derived status"))
)]
pub async fn list_issuances(
    State(state): State<AppState>,
    Query(query): Query<ListIssuancesQuery>,
) -> ApiResult<Json<Value>> {
    let filter = IssuanceFilter {
        outstanding_only: query.outstanding_only.unwrap_or(false),
        member_id: query.member_id,
        book_id: query.book_id,
        ..Default::default()
    };
    let issuances = issuance_service::list_issuances(&state, filter).await?;

    Ok(Json(json!({
        "issuances": issuances,
        "total": issuances.len()
    })))
}

#[utoipa::path(
    get,
    path = "/api/issuances/pending",
    responses((status = 200, description = "Outstanding issuances, soonest due first"))
)]
pub async fn pending_returns(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let pending = issuance_service::pending_returns(&state).await?;

    Ok(Json(json!({
        "issuances": pending,
        "total": pending.len()
    })))
}

#[utoipa::path(
    post,
    path = "/api/issuances",
    request_body = IssueRequest,
    responses(
        (status = 201, description = "Book issued"),
        (status = 400, description = "Unknown member or book, or due date in the past"),
        (status = 409, description = "No copies available")
    )
)]
pub async fn issue_book(
    State(state): State<AppState>,
    Json(payload): Json<IssueRequest>,
) -> ApiResult<impl IntoResponse> {
    let outcome = issuance_service::issue_book(&state, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "issuance": outcome.issuance,
            "book": outcome.book,
            "message": "Book issued successfully"
        })),
    ))
}

#[utoipa::path(
    put,
    path = "/api/issuances/{id}/return",
    params(("id" = i32, Path, description = "Issuance id")),
    responses(
        (status = 200, description = "Book returned"),
        (status = 404, description = "Issuance not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let outcome = issuance_service::return_book(&state, id).await?;

    Ok(Json(json!({
        "issuance": outcome.issuance,
        "book": outcome.book,
        "message": "Book returned successfully"
    })))
}
