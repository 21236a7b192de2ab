pub mod book;
pub mod issuance;
pub mod member;
