use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use library_desk::db;
use library_desk::domain::{
    Book, BookChanges, BookFilter, BookRepository, DomainError, Issuance, IssuanceFilter,
    IssuanceRepository, IssuanceStatus, IssuanceWithDetails, MemberInput, NewBook, NewIssuance,
};
use library_desk::infrastructure::{AppState, SeaOrmBookRepository, SeaOrmIssuanceRepository};
use library_desk::models::issuance;
use library_desk::services::book_service::{self, BookInput};
use library_desk::services::issuance_service::{self, IssueRequest};
use library_desk::services::{dashboard_service, member_service};
use sea_orm::{EntityTrait, PaginatorTrait};
use std::sync::Arc;

// Helper to create a test app state
async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::new(db)
}

// Helper to create a test member
async fn create_test_member(state: &AppState, name: &str) -> i32 {
    member_service::create_member(
        state,
        MemberInput {
            name: name.to_string(),
            email: format!("{}@example.org", name.to_lowercase().replace(' ', ".")),
            phone: None,
        },
    )
    .await
    .expect("Failed to create member")
    .id
}

// Helper to create a test book
async fn create_test_book(state: &AppState, title: &str, quantity: i32) -> i32 {
    book_service::create_book(
        state,
        BookInput {
            title: title.to_string(),
            author: "Test Author".to_string(),
            isbn: "9780000000000".to_string(),
            quantity,
        },
    )
    .await
    .expect("Failed to create book")
    .id
}

fn request(member_id: i32, book_id: i32) -> IssueRequest {
    IssueRequest {
        member_id,
        book_id,
        due_date: Some(Utc::now().date_naive() + Duration::days(7)),
    }
}

async fn available(state: &AppState, book_id: i32) -> i32 {
    book_service::get_book(state, book_id)
        .await
        .unwrap()
        .available_quantity
}

async fn assert_stock_consistent(state: &AppState, book_id: i32) {
    let book = book_service::get_book(state, book_id).await.unwrap();
    let outstanding = state
        .issuance_repo
        .count_outstanding(Some(book_id))
        .await
        .unwrap();
    assert_eq!(
        book.available_quantity as u64 + outstanding,
        book.quantity as u64,
        "available {} + outstanding {} != quantity {}",
        book.available_quantity,
        outstanding,
        book.quantity
    );
}

#[tokio::test]
async fn test_three_copies_scenario() {
    let state = setup_test_state().await;
    let member_id = create_test_member(&state, "Ada Lovelace").await;
    let book_id = create_test_book(&state, "Dune", 3).await;

    let mut issued = Vec::new();
    for _ in 0..3 {
        let outcome = issuance_service::issue_book(&state, request(member_id, book_id))
            .await
            .expect("Issue failed");
        issued.push(outcome.issuance.id);
        assert_stock_consistent(&state, book_id).await;
    }
    assert_eq!(available(&state, book_id).await, 0);

    // Fourth attempt is refused and records nothing
    let result = issuance_service::issue_book(&state, request(member_id, book_id)).await;
    assert!(matches!(result, Err(DomainError::OutOfStock)));
    assert_eq!(
        issuance::Entity::find().count(state.db()).await.unwrap(),
        3
    );

    let outcome = issuance_service::return_book(&state, issued[0])
        .await
        .expect("Return failed");
    assert_eq!(outcome.book.available_quantity, 1);
    assert!(outcome.issuance.return_date.is_some());
    assert_stock_consistent(&state, book_id).await;
}

#[tokio::test]
async fn test_issue_then_return_restores_availability() {
    let state = setup_test_state().await;
    let member_id = create_test_member(&state, "Alan Turing").await;
    let book_id = create_test_book(&state, "Foundation", 2).await;

    let outcome = issuance_service::issue_book(&state, request(member_id, book_id))
        .await
        .unwrap();
    assert_eq!(outcome.book.available_quantity, 1);
    assert_eq!(outcome.issuance.status(Utc::now()), IssuanceStatus::Borrowed);

    issuance_service::return_book(&state, outcome.issuance.id)
        .await
        .unwrap();
    assert_eq!(available(&state, book_id).await, 2);
}

#[tokio::test]
async fn test_double_return_is_rejected() {
    let state = setup_test_state().await;
    let member_id = create_test_member(&state, "Grace Hopper").await;
    let book_id = create_test_book(&state, "The Hobbit", 2).await;

    let issuance_id = issuance_service::issue_book(&state, request(member_id, book_id))
        .await
        .unwrap()
        .issuance
        .id;

    issuance_service::return_book(&state, issuance_id)
        .await
        .unwrap();
    let after_first = available(&state, book_id).await;

    let second = issuance_service::return_book(&state, issuance_id).await;
    assert!(matches!(second, Err(DomainError::AlreadyReturned)));
    assert_eq!(available(&state, book_id).await, after_first);
    assert_eq!(after_first, 2);
}

#[tokio::test]
async fn test_issue_out_of_stock_creates_no_issuance() {
    let state = setup_test_state().await;
    let member_id = create_test_member(&state, "Katherine Johnson").await;
    let book_id = create_test_book(&state, "Hidden Figures", 1).await;

    issuance_service::issue_book(&state, request(member_id, book_id))
        .await
        .unwrap();

    let result = issuance_service::issue_book(&state, request(member_id, book_id)).await;
    assert!(matches!(result, Err(DomainError::OutOfStock)));

    let outstanding = state
        .issuance_repo
        .count_outstanding(Some(book_id))
        .await
        .unwrap();
    assert_eq!(outstanding, 1);
    assert_eq!(available(&state, book_id).await, 0);
}

#[tokio::test]
async fn test_concurrent_issues_of_last_copy() {
    let state = setup_test_state().await;
    let first_member = create_test_member(&state, "Mary Shelley").await;
    let second_member = create_test_member(&state, "Percy Shelley").await;
    let book_id = create_test_book(&state, "Frankenstein", 1).await;

    // Both desks read one copy on the shelf before either reserves it
    let (first, second) = tokio::join!(
        issuance_service::issue_book(&state, request(first_member, book_id)),
        issuance_service::issue_book(&state, request(second_member, book_id)),
    );

    let results = [first, second];
    let issued = results.iter().filter(|r| r.is_ok()).count();
    let refused: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();

    assert_eq!(issued, 1);
    assert_eq!(refused.len(), 1);
    assert!(
        matches!(refused[0], DomainError::OutOfStock),
        "expected OutOfStock, got {:?}",
        refused[0]
    );

    assert_eq!(
        issuance::Entity::find().count(state.db()).await.unwrap(),
        1
    );
    assert_eq!(available(&state, book_id).await, 0);
    assert_stock_consistent(&state, book_id).await;
}

#[tokio::test]
async fn test_quantity_edit_below_borrowed_leaves_book_unchanged() {
    let state = setup_test_state().await;
    let member_id = create_test_member(&state, "Barbara Liskov").await;
    let book_id = create_test_book(&state, "Program Development", 5).await;

    for _ in 0..3 {
        issuance_service::issue_book(&state, request(member_id, book_id))
            .await
            .unwrap();
    }
    // quantity 5, available 2, borrowed 3

    let result = book_service::update_book(
        &state,
        book_id,
        BookInput {
            title: "Renamed".to_string(),
            author: "Test Author".to_string(),
            isbn: "9780000000000".to_string(),
            quantity: 2,
        },
    )
    .await;

    match result {
        Err(DomainError::InsufficientStock { quantity, borrowed }) => {
            assert_eq!(quantity, 2);
            assert_eq!(borrowed, 3);
        }
        other => panic!("expected InsufficientStock, got {:?}", other),
    }

    let book = book_service::get_book(&state, book_id).await.unwrap();
    assert_eq!(book.title, "Program Development");
    assert_eq!(book.quantity, 5);
    assert_eq!(book.available_quantity, 2);
}

#[tokio::test]
async fn test_quantity_edit_keeps_borrowed_copies_out() {
    let state = setup_test_state().await;
    let member_id = create_test_member(&state, "Edsger Dijkstra").await;
    let book_id = create_test_book(&state, "A Discipline of Programming", 2).await;

    issuance_service::issue_book(&state, request(member_id, book_id))
        .await
        .unwrap();

    let book = book_service::update_book(
        &state,
        book_id,
        BookInput {
            title: "A Discipline of Programming".to_string(),
            author: "Edsger W. Dijkstra".to_string(),
            isbn: "9780132158718".to_string(),
            quantity: 4,
        },
    )
    .await
    .unwrap();

    assert_eq!(book.quantity, 4);
    assert_eq!(book.available_quantity, 3);
    assert_eq!(book.author, "Edsger W. Dijkstra");
    assert_stock_consistent(&state, book_id).await;
}

#[tokio::test]
async fn test_overdue_issuance_shows_in_listing_and_dashboard() {
    let state = setup_test_state().await;
    let member_id = create_test_member(&state, "Margaret Hamilton").await;
    let book_id = create_test_book(&state, "Apollo Guidance", 3).await;

    // Written straight through the repository to backdate the due date
    state.book_repo.decrement_available(book_id).await.unwrap();
    state
        .issuance_repo
        .create(NewIssuance {
            member_id,
            book_id,
            issue_date: Utc::now() - Duration::days(20),
            due_date: Utc::now().date_naive() - Duration::days(6),
        })
        .await
        .unwrap();

    issuance_service::issue_book(&state, request(member_id, book_id))
        .await
        .unwrap();

    let listed = issuance_service::list_issuances(&state, IssuanceFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    // Newest first
    assert_eq!(listed[0].status, IssuanceStatus::Borrowed);
    assert_eq!(listed[1].status, IssuanceStatus::Overdue);
    assert_eq!(listed[1].member.as_ref().unwrap().name, "Margaret Hamilton");
    assert_eq!(listed[1].book.as_ref().unwrap().title, "Apollo Guidance");

    let summary = dashboard_service::dashboard_summary(&state).await.unwrap();
    assert_eq!(summary.total_members, 1);
    assert_eq!(summary.total_books, 1);
    assert_eq!(summary.outstanding_issuances, 2);
    assert_eq!(summary.overdue_issuances, 1);
    // Soonest due first
    assert_eq!(summary.pending_returns[0].status, IssuanceStatus::Overdue);
    assert_stock_consistent(&state, book_id).await;
}

#[tokio::test]
async fn test_available_only_filter() {
    let state = setup_test_state().await;
    let member_id = create_test_member(&state, "Donald Knuth").await;
    let lent_out = create_test_book(&state, "TAOCP Vol. 1", 1).await;
    create_test_book(&state, "Concrete Mathematics", 1).await;

    issuance_service::issue_book(&state, request(member_id, lent_out))
        .await
        .unwrap();

    let books = book_service::list_books(
        &state,
        BookFilter {
            available_only: true,
        },
    )
    .await
    .unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Concrete Mathematics");

    let all = book_service::list_books(&state, BookFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

/// Book repository whose increment always fails, as if the store went away
/// between the two writes of a return.
struct FailingIncrementBookRepository {
    inner: SeaOrmBookRepository,
}

#[async_trait]
impl BookRepository for FailingIncrementBookRepository {
    async fn find_all(&self, filter: BookFilter) -> Result<Vec<Book>, DomainError> {
        self.inner.find_all(filter).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn create(&self, book: NewBook) -> Result<Book, DomainError> {
        self.inner.create(book).await
    }

    async fn update(&self, id: i32, changes: BookChanges) -> Result<Book, DomainError> {
        self.inner.update(id, changes).await
    }

    async fn decrement_available(&self, id: i32) -> Result<Book, DomainError> {
        self.inner.decrement_available(id).await
    }

    async fn increment_available(&self, _id: i32) -> Result<Book, DomainError> {
        Err(DomainError::Storage("connection reset".to_string()))
    }

    async fn set_available(&self, id: i32, available_quantity: i32) -> Result<Book, DomainError> {
        self.inner.set_available(id, available_quantity).await
    }

    async fn count(&self) -> Result<u64, DomainError> {
        self.inner.count().await
    }
}

#[tokio::test]
async fn test_interrupted_return_is_surfaced_and_reconcilable() {
    let state = setup_test_state().await;
    let member_id = create_test_member(&state, "Frances Allen").await;
    let book_id = create_test_book(&state, "Compilers", 2).await;

    let issuance_id = issuance_service::issue_book(&state, request(member_id, book_id))
        .await
        .unwrap()
        .issuance
        .id;

    let broken = state
        .clone()
        .with_book_repo(Arc::new(FailingIncrementBookRepository {
            inner: SeaOrmBookRepository::new(state.db().clone()),
        }));

    let result = issuance_service::return_book(&broken, issuance_id).await;
    assert!(matches!(result, Err(DomainError::Storage(_))));

    // Issuance is returned but the copy was not credited
    let issuance = state
        .issuance_repo
        .find_by_id(issuance_id)
        .await
        .unwrap()
        .unwrap();
    assert!(issuance.return_date.is_some());
    assert_eq!(available(&state, book_id).await, 1);

    // Manual repair
    let book = book_service::reconcile_book(&state, book_id).await.unwrap();
    assert_eq!(book.available_quantity, 2);
    assert_stock_consistent(&state, book_id).await;
}

/// Issuance repository that cannot record new rows.
struct RejectingIssuanceRepository {
    inner: SeaOrmIssuanceRepository,
}

#[async_trait]
impl IssuanceRepository for RejectingIssuanceRepository {
    async fn find_all(
        &self,
        filter: IssuanceFilter,
    ) -> Result<Vec<IssuanceWithDetails>, DomainError> {
        self.inner.find_all(filter).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Issuance>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn create(&self, _issuance: NewIssuance) -> Result<Issuance, DomainError> {
        Err(DomainError::Storage("insert timed out".to_string()))
    }

    async fn mark_returned(
        &self,
        id: i32,
        returned_at: DateTime<Utc>,
    ) -> Result<Issuance, DomainError> {
        self.inner.mark_returned(id, returned_at).await
    }

    async fn count_outstanding(&self, book_id: Option<i32>) -> Result<u64, DomainError> {
        self.inner.count_outstanding(book_id).await
    }
}

#[tokio::test]
async fn test_failed_issuance_insert_releases_the_copy() {
    let state = setup_test_state().await;
    let member_id = create_test_member(&state, "Hedy Lamarr").await;
    let book_id = create_test_book(&state, "Ecstasy and Me", 1).await;

    let broken = state
        .clone()
        .with_issuance_repo(Arc::new(RejectingIssuanceRepository {
            inner: SeaOrmIssuanceRepository::new(state.db().clone()),
        }));

    let result = issuance_service::issue_book(&broken, request(member_id, book_id)).await;
    assert!(matches!(result, Err(DomainError::Storage(_))));

    assert_eq!(available(&state, book_id).await, 1);
    assert_stock_consistent(&state, book_id).await;
}

#[tokio::test]
async fn test_reconcile_consistent_book_is_a_no_op() {
    let state = setup_test_state().await;
    let member_id = create_test_member(&state, "Radia Perlman").await;
    let book_id = create_test_book(&state, "Interconnections", 3).await;

    issuance_service::issue_book(&state, request(member_id, book_id))
        .await
        .unwrap();

    let before = book_service::get_book(&state, book_id).await.unwrap();
    let after = book_service::reconcile_book(&state, book_id).await.unwrap();
    assert_eq!(after.available_quantity, 2);
    assert_eq!(after.updated_at, before.updated_at);
}
