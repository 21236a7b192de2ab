use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::dashboard::get_dashboard,
        api::members::list_members,
        api::members::get_member,
        api::members::create_member,
        api::members::update_member,
        api::books::list_books,
        api::books::get_book,
        api::books::create_book,
        api::books::update_book,
        api::books::reconcile_book,
        api::issuances::list_issuances,
        api::issuances::pending_returns,
        api::issuances::issue_book,
        api::issuances::return_book,
    ),
    components(
        schemas(
            crate::domain::Member,
            crate::domain::Book,
            crate::domain::Issuance,
            crate::domain::IssuanceStatus,
            crate::domain::IssuanceView,
            crate::domain::MemberSummary,
            crate::domain::BookSummary,
            crate::domain::MemberInput,
            crate::services::book_service::BookInput,
            crate::services::issuance_service::IssueRequest,
        )
    ),
    tags(
        (name = "library-desk", description = "Library desk API")
    )
)]
pub struct ApiDoc;
