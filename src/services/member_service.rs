//! Member Service - Pure business logic without HTTP layer

use crate::domain::{DomainError, Member, MemberInput};
use crate::infrastructure::AppState;

/// Trim the form and enforce the required fields. A blank phone is stored as NULL.
fn normalize(input: MemberInput) -> Result<MemberInput, DomainError> {
    let name = input.name.trim().to_string();
    let email = input.email.trim().to_string();

    if name.is_empty() || email.is_empty() {
        return Err(DomainError::Validation(
            "Name and email are required".to_string(),
        ));
    }

    let phone = input
        .phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    Ok(MemberInput { name, email, phone })
}

/// List all members ordered by name
pub async fn list_members(state: &AppState) -> Result<Vec<Member>, DomainError> {
    state.member_repo.find_all().await
}

/// Get a single member by ID
pub async fn get_member(state: &AppState, id: i32) -> Result<Member, DomainError> {
    state
        .member_repo
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound)
}

/// Create a new member
pub async fn create_member(state: &AppState, input: MemberInput) -> Result<Member, DomainError> {
    let input = normalize(input)?;
    let member = state.member_repo.create(input).await?;

    tracing::info!(member_id = member.id, "Member added: {} <{}>", member.name, member.email);
    Ok(member)
}

/// Update an existing member
pub async fn update_member(
    state: &AppState,
    id: i32,
    input: MemberInput,
) -> Result<Member, DomainError> {
    let input = normalize(input)?;
    let member = state.member_repo.update(id, input).await?;

    tracing::info!(member_id = member.id, "Member updated");
    Ok(member)
}
