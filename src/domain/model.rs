//! Domain records for members, books and issuances.
//!
//! Identity is the `id` field: two records with the same id compare equal even
//! if one of them is a stale copy.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::status::{IssuanceStatus, derive_status};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Member {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Member {}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    /// Total copies owned
    pub quantity: i32,
    /// Copies on the shelf right now
    pub available_quantity: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl Book {
    /// Copies currently lent out
    pub fn borrowed(&self) -> i32 {
        self.quantity - self.available_quantity
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Book {}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Issuance {
    pub id: i32,
    pub member_id: i32,
    pub book_id: i32,
    pub issue_date: DateTime<Utc>,
    pub due_date: NaiveDate,
    pub return_date: Option<DateTime<Utc>>,
}

impl Issuance {
    pub fn is_outstanding(&self) -> bool {
        self.return_date.is_none()
    }

    pub fn status(&self, now: DateTime<Utc>) -> IssuanceStatus {
        derive_status(self, now)
    }
}

impl PartialEq for Issuance {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Issuance {}

/// Member fields embedded in issuance listings
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemberSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Book fields embedded in issuance listings
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub author: String,
}

/// Issuance joined with the member and book it references
#[derive(Debug, Clone)]
pub struct IssuanceWithDetails {
    pub issuance: Issuance,
    pub member: Option<MemberSummary>,
    pub book: Option<BookSummary>,
}

/// Issuance as listed to staff, with its status derived at read time
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IssuanceView {
    pub id: i32,
    pub member_id: i32,
    pub book_id: i32,
    pub issue_date: DateTime<Utc>,
    pub due_date: NaiveDate,
    pub return_date: Option<DateTime<Utc>>,
    pub status: IssuanceStatus,
    pub member: Option<MemberSummary>,
    pub book: Option<BookSummary>,
}

impl IssuanceView {
    pub fn new(details: IssuanceWithDetails, now: DateTime<Utc>) -> Self {
        let status = details.issuance.status(now);
        let issuance = details.issuance;
        Self {
            id: issuance.id,
            member_id: issuance.member_id,
            book_id: issuance.book_id,
            issue_date: issuance.issue_date,
            due_date: issuance.due_date,
            return_date: issuance.return_date,
            status,
            member: details.member,
            book: details.book,
        }
    }
}
