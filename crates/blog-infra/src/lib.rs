//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external database, in-memory store only
//! - `postgres` - PostgreSQL store via SeaORM

pub mod auth;
pub mod database;

pub use auth::Argon2PasswordService;
pub use database::{DatabaseConfig, DatabaseConnections, InMemoryStore};
