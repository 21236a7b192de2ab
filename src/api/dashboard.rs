use axum::{Json, extract::State};

use super::error::ApiResult;
use crate::infrastructure::AppState;
use crate::services::dashboard_service::{self, DashboardSummary};

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses((status = 200, description = "Counts and pending returns"))
)]
pub async fn get_dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardSummary>> {
    Ok(Json(dashboard_service::dashboard_summary(&state).await?))
}
