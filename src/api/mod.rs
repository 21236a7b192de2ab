pub mod books;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod issuances;
pub mod log_relay;
pub mod members;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::infrastructure::AppState;

/// Routes served under `/api`
pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Dashboard
        .route("/dashboard", get(dashboard::get_dashboard))
        // Members (no deletion path)
        .route(
            "/members",
            get(members::list_members).post(members::create_member),
        )
        .route(
            "/members/:id",
            get(members::get_member).put(members::update_member),
        )
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/:id", get(books::get_book).put(books::update_book))
        .route("/books/:id/reconcile", post(books::reconcile_book))
        // Issuances
        .route(
            "/issuances",
            get(issuances::list_issuances).post(issuances::issue_book),
        )
        .route("/issuances/pending", get(issuances::pending_returns))
        .route("/issuances/:id/return", put(issuances::return_book))
        .with_state(state)
}

/// Routes of the client log relay, served at the root
pub fn relay_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/log", post(log_relay::relay_log))
        .with_state(state)
}
