use serde::{Deserialize, Serialize};

/// Role assigned to every user on signup.
pub const DEFAULT_ROLE_ID: i64 = 1;

/// Role a user must hold to take over orphaned posts.
pub const ADMIN_ROLE_ID: i64 = 2;

/// Role entity - immutable reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

impl Role {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
