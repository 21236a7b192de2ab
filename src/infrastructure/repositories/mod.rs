//! Repository implementations using SeaORM

pub mod book_repository;
pub mod issuance_repository;
pub mod member_repository;

pub use book_repository::SeaOrmBookRepository;
pub use issuance_repository::SeaOrmIssuanceRepository;
pub use member_repository::SeaOrmMemberRepository;
