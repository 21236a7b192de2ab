use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    /// Copies owned. Never below 1.
    pub quantity: i32,
    /// Copies on the shelf. Kept in `0..=quantity` by a CHECK constraint and
    /// by the conditional updates in the repository.
    pub available_quantity: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::issuance::Entity")]
    Issuances,
}

impl Related<super::issuance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Issuances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Book {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            author: model.author,
            isbn: model.isbn,
            quantity: model.quantity,
            available_quantity: model.available_quantity,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Model> for crate::domain::BookSummary {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            author: model.author,
        }
    }
}
