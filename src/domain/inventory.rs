//! Inventory consistency rules
//!
//! Pure transitions of a book's `available_quantity`. Every mutation touching
//! stock goes through one of these so that, for each book,
//! `available_quantity == quantity - outstanding issuances` keeps holding.
//! Nothing here performs I/O; callers pair the result with a write.

use super::DomainError;

/// A new book starts fully available.
pub fn on_book_created(quantity: i32) -> i32 {
    quantity
}

/// Availability after changing the number of copies owned.
///
/// Copies already lent out stay lent out, so the edit is rejected when the
/// new total is smaller than that count.
pub fn on_book_quantity_edited(
    old_quantity: i32,
    old_available: i32,
    new_quantity: i32,
) -> Result<i32, DomainError> {
    let borrowed = old_quantity - old_available;
    let available = new_quantity - borrowed;

    if available < 0 {
        return Err(DomainError::InsufficientStock {
            quantity: new_quantity,
            borrowed,
        });
    }

    Ok(available)
}

/// Availability after lending one copy.
pub fn on_issue(available_quantity: i32) -> Result<i32, DomainError> {
    if available_quantity <= 0 {
        return Err(DomainError::OutOfStock);
    }

    Ok(available_quantity - 1)
}

/// Availability after one copy comes back.
pub fn on_return(available_quantity: i32, quantity: i32) -> Result<i32, DomainError> {
    if available_quantity >= quantity {
        return Err(DomainError::OverReturn);
    }

    Ok(available_quantity + 1)
}

/// Availability recomputed from scratch out of the outstanding issuance count.
pub fn outstanding_to_available(quantity: i32, outstanding: u64) -> Result<i32, DomainError> {
    let borrowed = i32::try_from(outstanding).unwrap_or(i32::MAX);
    let available = quantity.saturating_sub(borrowed);

    if available < 0 {
        return Err(DomainError::InsufficientStock { quantity, borrowed });
    }

    Ok(available)
}
