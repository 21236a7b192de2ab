//! Dashboard Service - front-page summary

use serde::Serialize;

use crate::domain::{DomainError, IssuanceStatus, IssuanceView};
use crate::infrastructure::AppState;
use crate::services::issuance_service;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_members: u64,
    pub total_books: u64,
    pub outstanding_issuances: u64,
    pub overdue_issuances: u64,
    /// Outstanding issuances, soonest due first
    pub pending_returns: Vec<IssuanceView>,
}

pub async fn dashboard_summary(state: &AppState) -> Result<DashboardSummary, DomainError> {
    let total_members = state.member_repo.count().await?;
    let total_books = state.book_repo.count().await?;
    let pending_returns = issuance_service::pending_returns(state).await?;

    let overdue_issuances = pending_returns
        .iter()
        .filter(|i| i.status == IssuanceStatus::Overdue)
        .count() as u64;

    Ok(DashboardSummary {
        total_members,
        total_books,
        outstanding_issuances: pending_returns.len() as u64,
        overdue_issuances,
        pending_returns,
    })
}
