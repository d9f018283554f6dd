use std::sync::Arc;

use crate::domain::Role;
use crate::error::DomainError;
use crate::ports::{BaseRepository, RoleRepository};

pub struct RoleService {
    roles: Arc<dyn RoleRepository>,
}

impl RoleService {
    pub fn new(roles: Arc<dyn RoleRepository>) -> Self {
        Self { roles }
    }

    pub async fn get_role(&self, id: i64) -> Result<Option<Role>, DomainError> {
        Ok(self.roles.find_by_id(id).await?)
    }
}
