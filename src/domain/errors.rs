//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Missing or invalid required field
    #[error("Validation error: {0}")]
    Validation(String),
    /// Resource not found
    #[error("Resource not found")]
    NotFound,
    /// The book has no copy left to lend
    #[error("No copies of this book are available")]
    OutOfStock,
    /// A quantity edit would leave fewer copies than are currently lent out
    #[error("Cannot set quantity to {quantity}: {borrowed} copies are currently borrowed")]
    InsufficientStock { quantity: i32, borrowed: i32 },
    /// A return would push availability above the number of copies owned
    #[error("Return would exceed the number of copies owned")]
    OverReturn,
    /// The issuance already carries a return date
    #[error("Book has already been returned")]
    AlreadyReturned,
    /// Database/persistence error
    #[error("Database error: {0}")]
    Storage(String),
}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Storage(e.to_string())
    }
}
