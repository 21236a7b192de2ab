//! SeaORM implementation of MemberRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set};

use crate::domain::{DomainError, Member, MemberInput, MemberRepository};
use crate::models::member::{ActiveModel, Column, Entity as MemberEntity};
use crate::utils::time::now_timestamp;

/// SeaORM-based implementation of MemberRepository
pub struct SeaOrmMemberRepository {
    db: DatabaseConnection,
}

impl SeaOrmMemberRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MemberRepository for SeaOrmMemberRepository {
    async fn find_all(&self) -> Result<Vec<Member>, DomainError> {
        let members = MemberEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        Ok(members.into_iter().map(Member::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Member>, DomainError> {
        let member = MemberEntity::find_by_id(id).one(&self.db).await?;
        Ok(member.map(Member::from))
    }

    async fn create(&self, input: MemberInput) -> Result<Member, DomainError> {
        let now = now_timestamp();

        let new_member = ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = new_member.insert(&self.db).await?;
        Ok(Member::from(result))
    }

    async fn update(&self, id: i32, input: MemberInput) -> Result<Member, DomainError> {
        let existing = MemberEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(input.name);
        active.email = Set(input.email);
        active.phone = Set(input.phone);
        active.updated_at = Set(now_timestamp());

        let result = active.update(&self.db).await?;
        Ok(Member::from(result))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(MemberEntity::find().count(&self.db).await?)
    }
}
