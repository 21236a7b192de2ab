//! Mapping of domain failures onto HTTP responses.
//!
//! Every error body is `{"error": "<message>"}`; the client shows the message
//! and keeps its form input for a retry.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::DomainError;

#[derive(Debug)]
pub struct ApiError(pub DomainError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound => StatusCode::NOT_FOUND,
            DomainError::OutOfStock
            | DomainError::InsufficientStock { .. }
            | DomainError::OverReturn
            | DomainError::AlreadyReturned => StatusCode::CONFLICT,
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error.message = %self.0, "Unexpected error happened");
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError(DomainError::Validation("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError(DomainError::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError(DomainError::OutOfStock).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError(DomainError::InsufficientStock {
                quantity: 1,
                borrowed: 2
            })
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError(DomainError::AlreadyReturned).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError(DomainError::Storage("disk".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
