//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Records, the derived status, the inventory rules, trait definitions and
//! domain error types.

pub mod errors;
pub mod inventory;
pub mod model;
pub mod repositories;
pub mod status;

pub use errors::DomainError;
pub use model::*;
pub use repositories::*;
pub use status::{IssuanceStatus, derive_status};
