//! Derived issuance status. Never stored; always computed against the clock
//! at read time.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

use super::model::Issuance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum IssuanceStatus {
    Borrowed,
    Overdue,
    Returned,
}

impl fmt::Display for IssuanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssuanceStatus::Borrowed => write!(f, "Borrowed"),
            IssuanceStatus::Overdue => write!(f, "Overdue"),
            IssuanceStatus::Returned => write!(f, "Returned"),
        }
    }
}

/// The instant a due date starts counting as passed: midnight UTC of that day.
pub fn due_instant(due_date: NaiveDate) -> DateTime<Utc> {
    due_date.and_time(NaiveTime::MIN).and_utc()
}

pub fn derive_status(issuance: &Issuance, now: DateTime<Utc>) -> IssuanceStatus {
    if issuance.return_date.is_some() {
        IssuanceStatus::Returned
    } else if due_instant(issuance.due_date) < now {
        IssuanceStatus::Overdue
    } else {
        IssuanceStatus::Borrowed
    }
}
