//! Client log relay: the browser posts its log lines here and they are
//! appended to the server's log files.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::infrastructure::AppState;
use crate::infrastructure::log_sink::LogLevel;

#[derive(Debug, Deserialize)]
pub struct LogRequest {
    pub level: Option<String>,
    pub message: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn relay_log(
    State(state): State<AppState>,
    payload: Result<Json<LogRequest>, JsonRejection>,
) -> impl IntoResponse {
    // A body that is not a JSON object of strings counts as missing fields
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            tracing::debug!("Rejected relay body: {}", rejection);
            LogRequest {
                level: None,
                message: None,
            }
        }
    };

    let (Some(level), Some(message)) = (non_blank(payload.level), non_blank(payload.message))
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Level and message are required"})),
        )
            .into_response();
    };

    let level: LogLevel = match level.parse() {
        Ok(level) => level,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(json!({"error": e}))).into_response();
        }
    };

    match level {
        LogLevel::Info => tracing::info!(target: "client", "{}", message),
        LogLevel::Warn => tracing::warn!(target: "client", "{}", message),
        LogLevel::Error => tracing::error!(target: "client", "{}", message),
    }

    match state.log_sink.record(level, &message).await {
        Ok(()) => (StatusCode::OK, Json(json!({"message": "Log recorded"}))).into_response(),
        Err(e) => {
            tracing::error!(
                "Failed to write relay log to {}: {}",
                state.log_sink.dir().display(),
                e
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("Failed to write log: {}", e)})),
            )
                .into_response()
        }
    }
}
