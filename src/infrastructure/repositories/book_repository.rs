//! SeaORM implementation of BookRepository
//!
//! Stock counters are never written from a value read earlier. Every change to
//! `available_quantity` is a single conditional UPDATE relative to the stored
//! value, and zero affected rows is turned back into the matching domain error.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::inventory;
use crate::domain::{Book, BookChanges, BookFilter, BookRepository, DomainError, NewBook};
use crate::models::book::{ActiveModel, Column, Entity as BookEntity};
use crate::utils::time::now_timestamp;

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, id: i32) -> Result<Book, DomainError> {
        BookEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Book::from)
            .ok_or(DomainError::NotFound)
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self, filter: BookFilter) -> Result<Vec<Book>, DomainError> {
        let mut query = BookEntity::find();

        if filter.available_only {
            query = query.filter(Column::AvailableQuantity.gt(0));
        }

        let books = query.order_by_asc(Column::Title).all(&self.db).await?;
        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        let book = BookEntity::find_by_id(id).one(&self.db).await?;
        Ok(book.map(Book::from))
    }

    async fn create(&self, book: NewBook) -> Result<Book, DomainError> {
        let now = now_timestamp();

        let new_book = ActiveModel {
            title: Set(book.title),
            author: Set(book.author),
            isbn: Set(book.isbn),
            quantity: Set(book.quantity),
            available_quantity: Set(book.available_quantity),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = new_book.insert(&self.db).await?;
        Ok(Book::from(result))
    }

    async fn update(&self, id: i32, changes: BookChanges) -> Result<Book, DomainError> {
        // available' = available + (new_quantity - quantity), evaluated on the
        // stored row so concurrent issues and returns are accounted for.
        let shifted = Expr::col(Column::AvailableQuantity)
            .add(changes.quantity)
            .sub(Expr::col(Column::Quantity));

        let result = BookEntity::update_many()
            .col_expr(Column::AvailableQuantity, shifted.clone())
            .col_expr(Column::Quantity, Expr::value(changes.quantity))
            .col_expr(Column::Title, Expr::value(changes.title))
            .col_expr(Column::Author, Expr::value(changes.author))
            .col_expr(Column::Isbn, Expr::value(changes.isbn))
            .col_expr(Column::UpdatedAt, Expr::value(now_timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Expr::expr(shifted).gte(0))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            let current = self.load(id).await?;
            inventory::on_book_quantity_edited(
                current.quantity,
                current.available_quantity,
                changes.quantity,
            )?;
            return Err(DomainError::Storage(format!(
                "Book {} changed while it was being edited",
                id
            )));
        }

        self.load(id).await
    }

    async fn decrement_available(&self, id: i32) -> Result<Book, DomainError> {
        let result = BookEntity::update_many()
            .col_expr(
                Column::AvailableQuantity,
                Expr::col(Column::AvailableQuantity).sub(1),
            )
            .col_expr(Column::UpdatedAt, Expr::value(now_timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::AvailableQuantity.gt(0))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            // Either the book is gone or its shelf is empty
            let current = self.load(id).await?;
            inventory::on_issue(current.available_quantity)?;
            return Err(DomainError::OutOfStock);
        }

        self.load(id).await
    }

    async fn increment_available(&self, id: i32) -> Result<Book, DomainError> {
        let result = BookEntity::update_many()
            .col_expr(
                Column::AvailableQuantity,
                Expr::col(Column::AvailableQuantity).add(1),
            )
            .col_expr(Column::UpdatedAt, Expr::value(now_timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Expr::col(Column::AvailableQuantity).lt(Expr::col(Column::Quantity)))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            let current = self.load(id).await?;
            inventory::on_return(current.available_quantity, current.quantity)?;
            return Err(DomainError::OverReturn);
        }

        self.load(id).await
    }

    async fn set_available(&self, id: i32, available_quantity: i32) -> Result<Book, DomainError> {
        let existing = BookEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.available_quantity = Set(available_quantity);
        active.updated_at = Set(now_timestamp());

        let result = active.update(&self.db).await?;
        Ok(Book::from(result))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(BookEntity::find().count(&self.db).await?)
    }
}
