//! Domain entities - the core business objects.

mod post;
mod role;
mod user;

pub use post::{Category, ParseCategoryError, Post, PostDraft};
pub use role::{ADMIN_ROLE_ID, DEFAULT_ROLE_ID, Role};
pub use user::User;
