//! Issuance Service - issue and return books while keeping stock in step
//!
//! An issuance moves one way, `Outstanding -> Returned`. Each operation is two
//! independently committed writes (issuance row, book counter); there is no
//! transaction spanning them. When the second write fails the first is left in
//! place, the failure is logged with both ids and the error is returned. Such a
//! book is repaired with `book_service::reconcile_book`.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::inventory;
use crate::domain::{
    Book, DomainError, Issuance, IssuanceFilter, IssuanceOrder, IssuanceView, NewIssuance,
};
use crate::infrastructure::AppState;
use crate::utils::time::default_due_date;

/// Issue form fields
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IssueRequest {
    pub member_id: i32,
    pub book_id: i32,
    /// Defaults to today plus the configured loan period
    pub due_date: Option<NaiveDate>,
}

/// Result of an issue or a return: the issuance and the book's new stock
#[derive(Debug, Clone, Serialize)]
pub struct IssuanceOutcome {
    pub issuance: Issuance,
    pub book: Book,
}

/// Lend one copy of a book to a member.
///
/// The copy is reserved with a conditional decrement before the issuance row
/// is written, so a lost race with another desk ends in `OutOfStock` without
/// any row being created.
pub async fn issue_book(
    state: &AppState,
    request: IssueRequest,
) -> Result<IssuanceOutcome, DomainError> {
    // Dates are UTC calendar days, as in the overdue rule
    let now = Utc::now();
    let today = now.date_naive();
    let due_date = request
        .due_date
        .unwrap_or_else(|| default_due_date(today, state.loan_period_days()));

    // 1. Validate
    if due_date < today {
        return Err(DomainError::Validation(
            "Due date cannot be before today".to_string(),
        ));
    }

    if state
        .member_repo
        .find_by_id(request.member_id)
        .await?
        .is_none()
    {
        return Err(DomainError::Validation(format!(
            "Member {} does not exist",
            request.member_id
        )));
    }

    let book = state
        .book_repo
        .find_by_id(request.book_id)
        .await?
        .ok_or_else(|| {
            DomainError::Validation(format!("Book {} does not exist", request.book_id))
        })?;

    // 2. Stock check on the row we just read
    if let Err(e) = inventory::on_issue(book.available_quantity) {
        tracing::warn!(book_id = book.id, "Cannot issue '{}': {}", book.title, e);
        return Err(e);
    }

    // 3. Reserve the copy; re-checked atomically by the store
    let book = state
        .book_repo
        .decrement_available(book.id)
        .await
        .inspect_err(|e| tracing::warn!(book_id = book.id, "Cannot issue book: {}", e))?;

    // 4. Record the issuance
    let issuance = match state
        .issuance_repo
        .create(NewIssuance {
            member_id: request.member_id,
            book_id: book.id,
            issue_date: now,
            due_date,
        })
        .await
    {
        Ok(issuance) => issuance,
        Err(e) => {
            release_reservation(state, book.id).await;
            return Err(e);
        }
    };

    tracing::info!(
        issuance_id = issuance.id,
        member_id = issuance.member_id,
        book_id = book.id,
        available = book.available_quantity,
        %due_date,
        "Book issued: {}",
        book.title
    );

    Ok(IssuanceOutcome { issuance, book })
}

/// Give back the copy taken for an issuance that could not be recorded
async fn release_reservation(state: &AppState, book_id: i32) {
    match state.book_repo.increment_available(book_id).await {
        Ok(book) => tracing::warn!(
            book_id,
            available = book.available_quantity,
            "Issuance could not be recorded; reserved copy released"
        ),
        Err(e) => tracing::error!(
            book_id,
            error = %e,
            "Issuance could not be recorded and the reserved copy was not released; reconcile this book"
        ),
    }
}

/// Take a book back. Returning twice fails with `AlreadyReturned` and leaves
/// stock untouched.
pub async fn return_book(state: &AppState, issuance_id: i32) -> Result<IssuanceOutcome, DomainError> {
    // 1. Load and guard
    let issuance = state
        .issuance_repo
        .find_by_id(issuance_id)
        .await?
        .ok_or(DomainError::NotFound)?;

    if !issuance.is_outstanding() {
        tracing::warn!(issuance_id, "Issuance is already returned");
        return Err(DomainError::AlreadyReturned);
    }

    let book = state
        .book_repo
        .find_by_id(issuance.book_id)
        .await?
        .ok_or(DomainError::NotFound)?;

    if let Err(e) = inventory::on_return(book.available_quantity, book.quantity) {
        tracing::error!(
            issuance_id,
            book_id = book.id,
            "Stock for '{}' is already full; reconcile this book",
            book.title
        );
        return Err(e);
    }

    // 2. Mark returned; only succeeds once even under concurrent returns
    let issuance = state
        .issuance_repo
        .mark_returned(issuance_id, Utc::now())
        .await?;

    // 3. Credit the copy
    let book = state
        .book_repo
        .increment_available(issuance.book_id)
        .await
        .inspect_err(|e| {
            tracing::error!(
                issuance_id,
                book_id = issuance.book_id,
                error = %e,
                "Issuance marked returned but stock was not credited; reconcile this book"
            )
        })?;

    tracing::info!(
        issuance_id,
        book_id = book.id,
        available = book.available_quantity,
        "Book returned: {}",
        book.title
    );

    Ok(IssuanceOutcome { issuance, book })
}

/// List issuances, newest first, with status derived now
pub async fn list_issuances(
    state: &AppState,
    filter: IssuanceFilter,
) -> Result<Vec<IssuanceView>, DomainError> {
    let now = Utc::now();
    let issuances = state.issuance_repo.find_all(filter).await?;

    Ok(issuances
        .into_iter()
        .map(|details| IssuanceView::new(details, now))
        .collect())
}

/// Outstanding issuances, soonest due first
pub async fn pending_returns(state: &AppState) -> Result<Vec<IssuanceView>, DomainError> {
    list_issuances(
        state,
        IssuanceFilter {
            outstanding_only: true,
            order: IssuanceOrder::DueDateAsc,
            ..Default::default()
        },
    )
    .await
}
