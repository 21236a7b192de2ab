//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::{BookRepository, IssuanceRepository, MemberRepository};
use crate::infrastructure::config::DEFAULT_LOAN_PERIOD_DAYS;
use crate::infrastructure::log_sink::LogSink;
use crate::infrastructure::{
    SeaOrmBookRepository, SeaOrmIssuanceRepository, SeaOrmMemberRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    /// Member repository
    pub member_repo: Arc<dyn MemberRepository>,
    /// Book repository
    pub book_repo: Arc<dyn BookRepository>,
    /// Issuance repository
    pub issuance_repo: Arc<dyn IssuanceRepository>,
    /// Destination of the client log relay
    pub log_sink: Arc<LogSink>,
    loan_period_days: u32,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        let member_repo = Arc::new(SeaOrmMemberRepository::new(db.clone()));
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let issuance_repo = Arc::new(SeaOrmIssuanceRepository::new(db.clone()));

        Self {
            db,
            member_repo,
            book_repo,
            issuance_repo,
            log_sink: Arc::new(LogSink::new(PathBuf::from("logs"))),
            loan_period_days: DEFAULT_LOAN_PERIOD_DAYS,
        }
    }

    pub fn with_loan_period_days(mut self, days: u32) -> Self {
        self.loan_period_days = days;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_sink = Arc::new(LogSink::new(dir));
        self
    }

    /// Swap the book repository, e.g. to wrap it with instrumentation
    pub fn with_book_repo(mut self, book_repo: Arc<dyn BookRepository>) -> Self {
        self.book_repo = book_repo;
        self
    }

    pub fn with_issuance_repo(mut self, issuance_repo: Arc<dyn IssuanceRepository>) -> Self {
        self.issuance_repo = issuance_repo;
        self
    }

    pub fn loan_period_days(&self) -> u32 {
        self.loan_period_days
    }

    /// Get the database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

// Implement FromRef to allow extracting DatabaseConnection from AppState
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
