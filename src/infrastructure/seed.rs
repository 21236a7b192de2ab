use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set};

use crate::domain::inventory;
use crate::models::{book, member};
use crate::utils::time::now_timestamp;

/// Insert a few members and books into an empty database
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    if book::Entity::find().count(db).await? > 0 {
        tracing::info!("Catalogue is not empty, skipping demo data");
        return Ok(());
    }

    // 1. Members
    let members = vec![
        ("Ada Lovelace", "ada@example.org", Some("+44 20 7946 0018")),
        ("Alan Turing", "alan@example.org", None),
        ("Grace Hopper", "grace@example.org", Some("+1 202 555 0143")),
    ];

    for (name, email, phone) in members {
        let now = now_timestamp();
        let member = member::ActiveModel {
            name: Set(name.to_owned()),
            email: Set(email.to_owned()),
            phone: Set(phone.map(str::to_owned)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        member::Entity::insert(member).exec(db).await?;
    }

    // 2. Books
    let books = vec![
        ("Dune", "Frank Herbert", "9780441013593", 3),
        ("Foundation", "Isaac Asimov", "9780553293357", 2),
        ("The Hobbit", "J.R.R. Tolkien", "9780547928227", 1),
    ];

    for (title, author, isbn, quantity) in books {
        let now = now_timestamp();
        let book = book::ActiveModel {
            title: Set(title.to_owned()),
            author: Set(author.to_owned()),
            isbn: Set(isbn.to_owned()),
            quantity: Set(quantity),
            available_quantity: Set(inventory::on_book_created(quantity)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        book::Entity::insert(book).exec(db).await?;
    }

    Ok(())
}
