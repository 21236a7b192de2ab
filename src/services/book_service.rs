//! Book Service - catalogue management and stock reconciliation

use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::inventory;
use crate::domain::{Book, BookChanges, BookFilter, DomainError, NewBook};
use crate::infrastructure::AppState;

/// Book form fields, used for both create and edit
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub quantity: i32,
}

/// Trim the form and enforce the required fields
fn validate(input: BookInput) -> Result<BookInput, DomainError> {
    let title = input.title.trim().to_string();
    let author = input.author.trim().to_string();
    let isbn = input.isbn.trim().to_string();

    if title.is_empty() || author.is_empty() || isbn.is_empty() {
        return Err(DomainError::Validation(
            "Title, author and ISBN are required".to_string(),
        ));
    }

    if input.quantity < 1 {
        return Err(DomainError::Validation(
            "Quantity must be at least 1".to_string(),
        ));
    }

    Ok(BookInput {
        title,
        author,
        isbn,
        quantity: input.quantity,
    })
}

/// List books ordered by title
pub async fn list_books(state: &AppState, filter: BookFilter) -> Result<Vec<Book>, DomainError> {
    state.book_repo.find_all(filter).await
}

/// Get a single book by ID
pub async fn get_book(state: &AppState, id: i32) -> Result<Book, DomainError> {
    state
        .book_repo
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound)
}

/// Add a book to the catalogue; every copy starts on the shelf
pub async fn create_book(state: &AppState, input: BookInput) -> Result<Book, DomainError> {
    let input = validate(input)?;

    let book = state
        .book_repo
        .create(NewBook {
            available_quantity: inventory::on_book_created(input.quantity),
            title: input.title,
            author: input.author,
            isbn: input.isbn,
            quantity: input.quantity,
        })
        .await?;

    tracing::info!(book_id = book.id, quantity = book.quantity, "Book added: {}", book.title);
    Ok(book)
}

/// Edit a book. A quantity below the copies lent out is rejected and the
/// stored row is left untouched.
pub async fn update_book(state: &AppState, id: i32, input: BookInput) -> Result<Book, DomainError> {
    let input = validate(input)?;
    let current = get_book(state, id).await?;

    if let Err(e) = inventory::on_book_quantity_edited(
        current.quantity,
        current.available_quantity,
        input.quantity,
    ) {
        tracing::warn!(
            book_id = id,
            borrowed = current.borrowed(),
            "Rejected book edit: {}",
            e
        );
        return Err(e);
    }

    let book = state
        .book_repo
        .update(
            id,
            BookChanges {
                title: input.title,
                author: input.author,
                isbn: input.isbn,
                quantity: input.quantity,
            },
        )
        .await
        .inspect_err(|e| tracing::warn!(book_id = id, "Rejected book edit: {}", e))?;

    tracing::info!(
        book_id = book.id,
        quantity = book.quantity,
        available = book.available_quantity,
        "Book updated"
    );
    Ok(book)
}

/// Recount outstanding issuances and rewrite availability to match.
///
/// Manual repair for a book left inconsistent by an interrupted issue or
/// return.
pub async fn reconcile_book(state: &AppState, id: i32) -> Result<Book, DomainError> {
    let book = get_book(state, id).await?;
    let outstanding = state.issuance_repo.count_outstanding(Some(id)).await?;
    let available = inventory::outstanding_to_available(book.quantity, outstanding)?;

    if available == book.available_quantity {
        tracing::info!(book_id = id, "Book stock already consistent");
        return Ok(book);
    }

    tracing::warn!(
        book_id = id,
        stored = book.available_quantity,
        recomputed = available,
        outstanding,
        "Reconciling book stock"
    );
    state.book_repo.set_available(id, available).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, quantity: i32) -> BookInput {
        BookInput {
            title: title.to_string(),
            author: "Ursula K. Le Guin".to_string(),
            isbn: "9780441478125".to_string(),
            quantity,
        }
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        assert!(matches!(
            validate(input("The Left Hand of Darkness", 0)),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        assert!(matches!(
            validate(input("   ", 2)),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_trims() {
        let book = validate(input("  The Dispossessed ", 1)).unwrap();
        assert_eq!(book.title, "The Dispossessed");
    }
}
