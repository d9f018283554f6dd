use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;

/// User entity - represents a user in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Assigned by the store; zero until persisted.
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub active: bool,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, not yet persisted, inactive user without roles.
    pub fn new(email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            email,
            password_hash,
            active: false,
            roles: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_role(&self, role_id: i64) -> bool {
        self.roles.iter().any(|r| r.id == role_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_is_inactive_and_unsaved() {
        let user = User::new("w@w.pl".to_string(), "hash".to_string());
        assert_eq!(user.id, 0);
        assert!(!user.active);
        assert!(user.roles.is_empty());
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User::new("w@w.pl".to_string(), "secret-hash".to_string());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "w@w.pl");
    }

    #[test]
    fn has_role_checks_ids() {
        let mut user = User::new("a@b.c".to_string(), "h".to_string());
        user.roles.push(Role::new(2, "ROLE_ADMIN"));
        assert!(user.has_role(2));
        assert!(!user.has_role(1));
    }
}
