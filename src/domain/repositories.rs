//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use super::DomainError;
use super::model::{Book, Issuance, IssuanceWithDetails, Member};

/// Member form fields, used for both create and edit
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MemberInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Repository trait for Member entity
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find all members ordered by name
    async fn find_all(&self) -> Result<Vec<Member>, DomainError>;

    /// Find a member by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Member>, DomainError>;

    /// Create a new member
    async fn create(&self, input: MemberInput) -> Result<Member, DomainError>;

    /// Update an existing member
    async fn update(&self, id: i32, input: MemberInput) -> Result<Member, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}

/// Filter criteria for book queries
#[derive(Debug, Default, Clone)]
pub struct BookFilter {
    /// Only books with at least one copy on the shelf
    pub available_only: bool,
}

/// Row written when a book is added to the catalogue
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub quantity: i32,
    pub available_quantity: i32,
}

/// Catalogue edit. Availability is shifted by the quantity delta inside the
/// same statement, so copies lent out meanwhile are never lost.
#[derive(Debug, Clone)]
pub struct BookChanges {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub quantity: i32,
}

/// Repository trait for Book entity
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find all books matching the filter, ordered by title
    async fn find_all(&self, filter: BookFilter) -> Result<Vec<Book>, DomainError>;

    /// Find a single book by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError>;

    /// Create a new book
    async fn create(&self, book: NewBook) -> Result<Book, DomainError>;

    /// Apply a catalogue edit. Fails with `InsufficientStock` when the new
    /// quantity is below the copies currently lent out.
    async fn update(&self, id: i32, changes: BookChanges) -> Result<Book, DomainError>;

    /// Take one copy off the shelf, only if one is there (`OutOfStock` otherwise)
    async fn decrement_available(&self, id: i32) -> Result<Book, DomainError>;

    /// Put one copy back, only if it stays within quantity (`OverReturn` otherwise)
    async fn increment_available(&self, id: i32) -> Result<Book, DomainError>;

    /// Overwrite availability, used by manual reconciliation
    async fn set_available(&self, id: i32, available_quantity: i32) -> Result<Book, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}

/// Sort order for issuance listings
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum IssuanceOrder {
    /// Most recently issued first
    #[default]
    IssueDateDesc,
    /// Soonest due first
    DueDateAsc,
}

/// Filter criteria for issuance queries
#[derive(Debug, Default, Clone)]
pub struct IssuanceFilter {
    pub outstanding_only: bool,
    pub member_id: Option<i32>,
    pub book_id: Option<i32>,
    pub order: IssuanceOrder,
}

/// Row written when a book is issued
#[derive(Debug, Clone)]
pub struct NewIssuance {
    pub member_id: i32,
    pub book_id: i32,
    pub issue_date: DateTime<Utc>,
    pub due_date: NaiveDate,
}

/// Repository trait for Issuance entity
#[async_trait]
pub trait IssuanceRepository: Send + Sync {
    /// Find issuances with their member and book
    async fn find_all(&self, filter: IssuanceFilter)
    -> Result<Vec<IssuanceWithDetails>, DomainError>;

    /// Find an issuance by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Issuance>, DomainError>;

    /// Record a new outstanding issuance
    async fn create(&self, issuance: NewIssuance) -> Result<Issuance, DomainError>;

    /// Set the return date, only if none is set yet (`AlreadyReturned` otherwise)
    async fn mark_returned(
        &self,
        id: i32,
        returned_at: DateTime<Utc>,
    ) -> Result<Issuance, DomainError>;

    /// Count outstanding issuances, optionally for one book
    async fn count_outstanding(&self, book_id: Option<i32>) -> Result<u64, DomainError>;
}
