use std::sync::Arc;

use crate::domain::{DEFAULT_ROLE_ID, User};
use crate::error::DomainError;
use crate::ports::{BaseRepository, PasswordService, RoleRepository, UserRepository};
use crate::validation::validate_signup;

/// User lifecycle: signup, lookup, activation and removal.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users,
            roles,
            passwords,
        }
    }

    /// Sign up a new user holding only the default role.
    ///
    /// # Errors
    /// * `Validation` - malformed email or empty password
    /// * `Internal` - the default role is missing from the store
    /// * `Repository(Constraint)` - the email is already registered
    pub async fn add_user(&self, email: &str, password: &str) -> Result<User, DomainError> {
        validate_signup(email, password)?;

        let role = self
            .roles
            .find_by_id(DEFAULT_ROLE_ID)
            .await?
            .ok_or_else(|| {
                DomainError::Internal(format!("default role {DEFAULT_ROLE_ID} is not configured"))
            })?;

        let password_hash = self
            .passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = self
            .users
            .insert_with_role(User::new(email.trim().to_string(), password_hash), &role)
            .await?;

        tracing::info!(user_id = user.id, role = %role.name, "User signed up");
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>, DomainError> {
        Ok(self.users.find_by_id(id).await?)
    }

    pub async fn all_users(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.find_all().await?)
    }

    /// Idempotent; `false` only when the user does not exist.
    pub async fn activate(&self, id: i64) -> Result<bool, DomainError> {
        let activated = self.users.activate(id).await?;
        tracing::info!(user_id = id, activated, "User activation requested");
        Ok(activated)
    }

    pub async fn deactivate(&self, id: i64) -> Result<bool, DomainError> {
        let deactivated = self.users.deactivate(id).await?;
        tracing::info!(user_id = id, deactivated, "User deactivation requested");
        Ok(deactivated)
    }

    /// Remove the user. Its posts stay, without an author.
    pub async fn delete_user(&self, id: i64) -> Result<bool, DomainError> {
        match self.users.delete(id).await? {
            Some(orphaned) => {
                tracing::info!(user_id = id, orphaned, "User deleted");
                Ok(true)
            }
            None => {
                tracing::warn!(user_id = id, "Delete requested for unknown user");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::domain::Role;
    use crate::error::RepoError;
    use crate::ports::PasswordError;

    /// Store that only knows one user and no roles.
    struct OneUserStore {
        user: User,
    }

    #[async_trait]
    impl BaseRepository<User, i64> for OneUserStore {
        async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
            Ok((id == self.user.id).then(|| self.user.clone()))
        }

        async fn find_all(&self) -> Result<Vec<User>, RepoError> {
            Ok(vec![self.user.clone()])
        }
    }

    #[async_trait]
    impl UserRepository for OneUserStore {
        async fn insert_with_role(&self, user: User, _role: &Role) -> Result<User, RepoError> {
            Ok(user)
        }

        async fn activate(&self, id: i64) -> Result<bool, RepoError> {
            Ok(id == self.user.id)
        }

        async fn deactivate(&self, id: i64) -> Result<bool, RepoError> {
            Ok(id == self.user.id)
        }

        async fn delete(&self, id: i64) -> Result<Option<u64>, RepoError> {
            Ok((id == self.user.id).then_some(0))
        }
    }

    #[async_trait]
    impl BaseRepository<Role, i64> for OneUserStore {
        async fn find_by_id(&self, _id: i64) -> Result<Option<Role>, RepoError> {
            Ok(None)
        }

        async fn find_all(&self) -> Result<Vec<Role>, RepoError> {
            Ok(Vec::new())
        }
    }

    impl RoleRepository for OneUserStore {}

    struct PlainPasswords;

    impl PasswordService for PlainPasswords {
        fn hash(&self, password: &str) -> Result<String, PasswordError> {
            Ok(format!("plain:{password}"))
        }
    }

    fn service() -> UserService {
        let mut user = User::new("w@w.pl".to_string(), "plain:qqq".to_string());
        user.id = 1;
        let store = Arc::new(OneUserStore { user });
        UserService::new(store.clone(), store, Arc::new(PlainPasswords))
    }

    #[tokio::test]
    async fn get_user_returns_stored_user() {
        let result = service().get_user(1).await.unwrap().unwrap();
        assert_eq!(result.email, "w@w.pl");
    }

    #[tokio::test]
    async fn get_user_unknown_id_is_absent() {
        assert!(service().get_user(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn add_user_without_default_role_is_internal_error() {
        let err = service().add_user("new@w.pl", "secret").await.unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[tokio::test]
    async fn add_user_rejects_bad_email_before_touching_store() {
        let err = service().add_user("nope", "secret").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_unknown_user_reports_false() {
        assert!(!service().delete_user(42).await.unwrap());
        assert!(service().delete_user(1).await.unwrap());
    }
}
