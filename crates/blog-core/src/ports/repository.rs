use async_trait::async_trait;

use crate::domain::{Post, PostDraft, Role, User};
use crate::error::RepoError;
use crate::query::{Page, PageRequest, SortOrder};

/// Generic read access shared by every store.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// List every entity, ordered by ID.
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;
}

/// User store. Users are returned with their roles loaded.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i64> {
    /// Insert a new user together with its single initial role.
    async fn insert_with_role(&self, user: User, role: &Role) -> Result<User, RepoError>;

    /// Mark a user active. Returns `false` when no such user exists.
    async fn activate(&self, id: i64) -> Result<bool, RepoError>;

    /// Soft-delete: mark a user inactive. Returns `false` when no such user exists.
    async fn deactivate(&self, id: i64) -> Result<bool, RepoError>;

    /// Remove a user with its role assignments and clear the author of every
    /// post it wrote, as one atomic step. Returns the number of posts left
    /// without an author, or `None` when no such user exists.
    async fn delete(&self, id: i64) -> Result<Option<u64>, RepoError>;
}

/// Role store - reference data, read only.
pub trait RoleRepository: BaseRepository<Role, i64> {}

/// Post store.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    async fn insert(&self, draft: PostDraft, author: &User) -> Result<Post, RepoError>;

    /// All posts ordered by `order.field`. Unknown fields fail with
    /// [`RepoError::InvalidField`].
    async fn find_all_ordered(&self, order: &SortOrder) -> Result<Vec<Post>, RepoError>;

    /// One page of posts ordered by ID.
    async fn find_page(&self, request: PageRequest) -> Result<Page<Post>, RepoError>;

    /// Point every post without an author at `admin_id`. Returns the number of posts touched.
    async fn reassign_orphaned(&self, admin_id: i64) -> Result<u64, RepoError>;

    /// `(category, count)` rows, one per category in use.
    async fn category_counts(&self) -> Result<Vec<(String, i64)>, RepoError>;
}
