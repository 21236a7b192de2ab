//! Timestamp and date encoding used by the `TEXT` columns.
//!
//! Timestamps are RFC 3339 in UTC with millisecond precision, so that string
//! order matches chronological order. Dates are `YYYY-MM-DD`.

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};

use crate::domain::DomainError;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::Storage(format!("Invalid timestamp '{}': {}", value, e)))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| DomainError::Storage(format!("Invalid date '{}': {}", value, e)))
}

/// Due date given to an issuance when staff do not pick one
pub fn default_due_date(today: NaiveDate, loan_period_days: u32) -> NaiveDate {
    today + Duration::days(i64::from(loan_period_days))
}
