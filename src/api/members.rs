//! Member API handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use super::error::ApiResult;
use crate::domain::MemberInput;
use crate::infrastructure::AppState;
use crate::services::member_service;

#[utoipa::path(
    get,
    path = "/api/members",
    responses((status = 200, description = "Members ordered by name"))
)]
pub async fn list_members(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let members = member_service::list_members(&state).await?;

    Ok(Json(json!({
        "members": members,
        "total": members.len()
    })))
}

#[utoipa::path(
    get,
    path = "/api/members/{id}",
    params(("id" = i32, Path, description = "Member id")),
    responses(
        (status = 200, description = "Member found"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let member = member_service::get_member(&state, id).await?;
    Ok(Json(json!({ "member": member })))
}

#[utoipa::path(
    post,
    path = "/api/members",
    request_body = MemberInput,
    responses(
        (status = 201, description = "Member created"),
        (status = 400, description = "Name or email missing")
    )
)]
pub async fn create_member(
    State(state): State<AppState>,
    Json(payload): Json<MemberInput>,
) -> ApiResult<impl IntoResponse> {
    let member = member_service::create_member(&state, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "member": member,
            "message": "Member added successfully"
        })),
    ))
}

#[utoipa::path(
    put,
    path = "/api/members/{id}",
    params(("id" = i32, Path, description = "Member id")),
    request_body = MemberInput,
    responses(
        (status = 200, description = "Member updated"),
        (status = 400, description = "Name or email missing"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<MemberInput>,
) -> ApiResult<Json<Value>> {
    let member = member_service::update_member(&state, id, payload).await?;

    Ok(Json(json!({
        "member": member,
        "message": "Member updated successfully"
    })))
}
