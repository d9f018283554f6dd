//! Application services - the flows behind each endpoint.
//!
//! Services own the checks and sequencing; stores stay plain CRUD.

mod post_service;
mod role_service;
mod user_service;

pub use post_service::{PostService, PostSubmissionOutcome};
pub use role_service::RoleService;
pub use user_service::UserService;
