//! SeaORM entities for the blog schema.

pub mod post;
pub mod role;
pub mod user;
pub mod user_role;
