//! SeaORM implementation of IssuanceRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;

use crate::domain::{
    BookSummary, DomainError, Issuance, IssuanceFilter, IssuanceOrder, IssuanceRepository,
    IssuanceWithDetails, MemberSummary, NewIssuance,
};
use crate::models::book::{self, Entity as BookEntity};
use crate::models::issuance::{ActiveModel, Column, Entity as IssuanceEntity};
use crate::models::member::Entity as MemberEntity;
use crate::utils::time::{format_date, format_timestamp};

/// SeaORM-based implementation of IssuanceRepository
pub struct SeaOrmIssuanceRepository {
    db: DatabaseConnection,
}

impl SeaOrmIssuanceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, id: i32) -> Result<Issuance, DomainError> {
        IssuanceEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?
            .try_into()
    }
}

#[async_trait]
impl IssuanceRepository for SeaOrmIssuanceRepository {
    async fn find_all(
        &self,
        filter: IssuanceFilter,
    ) -> Result<Vec<IssuanceWithDetails>, DomainError> {
        let mut condition = Condition::all();

        if filter.outstanding_only {
            condition = condition.add(Column::ReturnDate.is_null());
        }

        if let Some(member_id) = filter.member_id {
            condition = condition.add(Column::MemberId.eq(member_id));
        }

        if let Some(book_id) = filter.book_id {
            condition = condition.add(Column::BookId.eq(book_id));
        }

        let query = IssuanceEntity::find().filter(condition);
        let query = match filter.order {
            IssuanceOrder::IssueDateDesc => query
                .order_by_desc(Column::IssueDate)
                .order_by_desc(Column::Id),
            IssuanceOrder::DueDateAsc => query.order_by_asc(Column::DueDate).order_by_asc(Column::Id),
        };

        let issuances_with_members = query.find_also_related(MemberEntity).all(&self.db).await?;

        // Collect book IDs to fetch titles and authors in one query
        let book_ids: Vec<i32> = issuances_with_members
            .iter()
            .map(|(i, _)| i.book_id)
            .collect();

        let mut book_map: HashMap<i32, BookSummary> = HashMap::new();

        if !book_ids.is_empty() {
            let books = BookEntity::find()
                .filter(book::Column::Id.is_in(book_ids))
                .all(&self.db)
                .await?;

            for book in books {
                book_map.insert(book.id, BookSummary::from(book));
            }
        }

        issuances_with_members
            .into_iter()
            .map(|(issuance, member)| {
                let book = book_map.get(&issuance.book_id).cloned();
                Ok(IssuanceWithDetails {
                    issuance: Issuance::try_from(issuance)?,
                    member: member.map(MemberSummary::from),
                    book,
                })
            })
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Issuance>, DomainError> {
        IssuanceEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Issuance::try_from)
            .transpose()
    }

    async fn create(&self, issuance: NewIssuance) -> Result<Issuance, DomainError> {
        let issue_date = format_timestamp(issuance.issue_date);

        let new_issuance = ActiveModel {
            member_id: Set(issuance.member_id),
            book_id: Set(issuance.book_id),
            issue_date: Set(issue_date.clone()),
            due_date: Set(format_date(issuance.due_date)),
            return_date: Set(None),
            created_at: Set(issue_date.clone()),
            updated_at: Set(issue_date),
            ..Default::default()
        };

        new_issuance.insert(&self.db).await?.try_into()
    }

    async fn mark_returned(
        &self,
        id: i32,
        returned_at: DateTime<Utc>,
    ) -> Result<Issuance, DomainError> {
        let returned_at = format_timestamp(returned_at);

        let result = IssuanceEntity::update_many()
            .col_expr(Column::ReturnDate, Expr::value(Some(returned_at.clone())))
            .col_expr(Column::UpdatedAt, Expr::value(returned_at))
            .filter(Column::Id.eq(id))
            .filter(Column::ReturnDate.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            // Missing row surfaces as NotFound from load()
            self.load(id).await?;
            return Err(DomainError::AlreadyReturned);
        }

        self.load(id).await
    }

    async fn count_outstanding(&self, book_id: Option<i32>) -> Result<u64, DomainError> {
        let mut query = IssuanceEntity::find().filter(Column::ReturnDate.is_null());

        if let Some(book_id) = book_id {
            query = query.filter(Column::BookId.eq(book_id));
        }

        Ok(query.count(&self.db).await?)
    }
}
