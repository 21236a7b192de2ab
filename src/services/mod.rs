//! Services Layer
//!
//! This module contains pure business logic extracted from HTTP handlers.
//! Handlers call into these; they never touch repositories directly.

pub mod book_service;
pub mod dashboard_service;
pub mod issuance_service;
pub mod member_service;
