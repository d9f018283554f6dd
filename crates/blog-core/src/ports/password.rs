//! Password hashing port.

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;
}

/// Password hashing errors.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Hashing error: {0}")]
    Hashing(String),
}
