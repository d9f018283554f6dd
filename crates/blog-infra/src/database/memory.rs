//! In-memory store - used when no database is configured, and in tests.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use blog_core::domain::{
    ADMIN_ROLE_ID, Category, DEFAULT_ROLE_ID, Post, PostDraft, Role, User,
};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository, RoleRepository, UserRepository};
use blog_core::query::{Page, PageRequest, SortDirection, SortOrder};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    roles: BTreeMap<i64, Role>,
    posts: BTreeMap<i64, Post>,
    last_user_id: i64,
    last_post_id: i64,
}

/// Users, roles and posts kept in ordered maps behind one async RwLock.
///
/// Implements every store port, so a single `Arc<InMemoryStore>` can back
/// all services. Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the default and admin roles.
    pub fn with_default_roles() -> Self {
        Self::with_roles([
            Role::new(DEFAULT_ROLE_ID, "ROLE_USER"),
            Role::new(ADMIN_ROLE_ID, "ROLE_ADMIN"),
        ])
    }

    pub fn with_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        let tables = Tables {
            roles: roles.into_iter().map(|r| (r.id, r)).collect(),
            ..Tables::default()
        };
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Grant an extra role to an existing user. Returns `false` if either is unknown.
    pub async fn grant_role(&self, user_id: i64, role_id: i64) -> bool {
        let mut tables = self.tables.write().await;
        let Some(role) = tables.roles.get(&role_id).cloned() else {
            return false;
        };
        match tables.users.get_mut(&user_id) {
            Some(user) => {
                if !user.has_role(role_id) {
                    user.roles.push(role);
                }
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl BaseRepository<User, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert_with_role(&self, mut user: User, role: &Role) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        if !tables.roles.contains_key(&role.id) {
            return Err(RepoError::Constraint(format!("unknown role {}", role.id)));
        }

        tables.last_user_id += 1;
        user.id = tables.last_user_id;
        user.roles = vec![role.clone()];
        tables.users.insert(user.id, user.clone());

        tracing::debug!(user_id = user.id, "User stored in memory");
        Ok(user)
    }

    async fn activate(&self, id: i64) -> Result<bool, RepoError> {
        Ok(self.set_active(id, true).await)
    }

    async fn deactivate(&self, id: i64) -> Result<bool, RepoError> {
        Ok(self.set_active(id, false).await)
    }

    async fn delete(&self, id: i64) -> Result<Option<u64>, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(None);
        }

        let mut orphaned = 0;
        for post in tables.posts.values_mut() {
            if post.author_id == Some(id) {
                post.author_id = None;
                orphaned += 1;
            }
        }
        Ok(Some(orphaned))
    }
}

impl InMemoryStore {
    async fn set_active(&self, id: i64, active: bool) -> bool {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) => {
                user.active = active;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl BaseRepository<Role, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Role>, RepoError> {
        Ok(self.tables.read().await.roles.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Role>, RepoError> {
        Ok(self.tables.read().await.roles.values().cloned().collect())
    }
}

impl RoleRepository for InMemoryStore {}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.tables.read().await.posts.values().cloned().collect())
    }
}

type PostComparator = fn(&Post, &Post) -> Ordering;

/// Sortable post fields, by snake_case or camelCase name.
fn post_comparator(field: &str) -> Option<PostComparator> {
    let comparator: PostComparator = match field {
        "id" => |a, b| a.id.cmp(&b.id),
        "title" => |a, b| a.title.cmp(&b.title),
        "content" => |a, b| a.content.cmp(&b.content),
        "category" => |a, b| a.category.as_str().cmp(b.category.as_str()),
        "author_id" | "authorId" => |a, b| a.author_id.cmp(&b.author_id),
        "created_at" | "createdAt" => |a, b| a.created_at.cmp(&b.created_at),
        _ => return None,
    };
    Some(comparator)
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn insert(&self, draft: PostDraft, author: &User) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&author.id) {
            return Err(RepoError::Constraint(format!("unknown author {}", author.id)));
        }

        tables.last_post_id += 1;
        let post = Post {
            id: tables.last_post_id,
            title: draft.title,
            content: draft.content,
            category: draft.category,
            author_id: Some(author.id),
            created_at: Utc::now(),
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_all_ordered(&self, order: &SortOrder) -> Result<Vec<Post>, RepoError> {
        let comparator = post_comparator(&order.field)
            .ok_or_else(|| RepoError::InvalidField(order.field.clone()))?;

        let mut posts: Vec<Post> = self.tables.read().await.posts.values().cloned().collect();
        match order.direction {
            SortDirection::Asc => posts.sort_by(comparator),
            SortDirection::Desc => posts.sort_by(|a, b| comparator(b, a)),
        }
        Ok(posts)
    }

    async fn find_page(&self, request: PageRequest) -> Result<Page<Post>, RepoError> {
        let tables = self.tables.read().await;
        let total = tables.posts.len() as u64;

        let content = tables
            .posts
            .values()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(request.size()).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(Page::new(content, request, total))
    }

    async fn reassign_orphaned(&self, admin_id: i64) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;
        let mut touched = 0;
        for post in tables.posts.values_mut().filter(|p| p.is_orphaned()) {
            post.author_id = Some(admin_id);
            touched += 1;
        }
        Ok(touched)
    }

    async fn category_counts(&self) -> Result<Vec<(String, i64)>, RepoError> {
        let tables = self.tables.read().await;
        let mut counts: BTreeMap<Category, i64> = BTreeMap::new();
        for post in tables.posts.values() {
            *counts.entry(post.category).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(category, count)| (category.as_str().to_string(), count))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, category: Category, author_id: i64) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            content: "body".to_string(),
            category,
            author_id,
        }
    }

    async fn store_with_author() -> (InMemoryStore, User) {
        let store = InMemoryStore::with_default_roles();
        let role = Role::new(DEFAULT_ROLE_ID, "ROLE_USER");
        let user = store
            .insert_with_role(User::new("a@blog.dev".to_string(), "h".to_string()), &role)
            .await
            .unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_and_role() {
        let (store, user) = store_with_author().await;
        assert_eq!(user.id, 1);
        assert_eq!(user.roles, vec![Role::new(DEFAULT_ROLE_ID, "ROLE_USER")]);

        let role = Role::new(DEFAULT_ROLE_ID, "ROLE_USER");
        let second = store
            .insert_with_role(User::new("b@blog.dev".to_string(), "h".to_string()), &role)
            .await
            .unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_constraint_violation() {
        let (store, _) = store_with_author().await;
        let role = Role::new(DEFAULT_ROLE_ID, "ROLE_USER");
        let err = store
            .insert_with_role(User::new("a@blog.dev".to_string(), "h".to_string()), &role)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn activation_is_idempotent() {
        let (store, user) = store_with_author().await;
        assert!(store.activate(user.id).await.unwrap());
        assert!(store.activate(user.id).await.unwrap());
        assert!(!store.activate(99).await.unwrap());

        let users: &dyn UserRepository = &store;
        assert!(users.find_by_id(user.id).await.unwrap().unwrap().active);
    }

    #[tokio::test]
    async fn unknown_sort_field_is_rejected() {
        let (store, _) = store_with_author().await;
        let err = store
            .find_all_ordered(&SortOrder::new("password", true))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::InvalidField(field) if field == "password"));
    }

    #[tokio::test]
    async fn sorts_by_title_in_both_directions() {
        let (store, user) = store_with_author().await;
        for title in ["b", "c", "a"] {
            store.insert(draft(title, Category::It, user.id), &user).await.unwrap();
        }

        let asc = store.find_all_ordered(&SortOrder::new("title", true)).await.unwrap();
        let titles: Vec<_> = asc.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);

        let desc = store.find_all_ordered(&SortOrder::new("title", false)).await.unwrap();
        let titles: Vec<_> = desc.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn category_counts_group_posts() {
        let (store, user) = store_with_author().await;
        store.insert(draft("a", Category::It, user.id), &user).await.unwrap();
        store.insert(draft("b", Category::DevOps, user.id), &user).await.unwrap();
        store.insert(draft("c", Category::DevOps, user.id), &user).await.unwrap();

        let counts = store.category_counts().await.unwrap();
        assert_eq!(
            counts,
            vec![("IT".to_string(), 1), ("DEVOPS".to_string(), 2)]
        );
    }

    #[tokio::test]
    async fn grant_role_adds_role_once() {
        let (store, user) = store_with_author().await;
        assert!(store.grant_role(user.id, ADMIN_ROLE_ID).await);
        assert!(store.grant_role(user.id, ADMIN_ROLE_ID).await);
        assert!(!store.grant_role(user.id, 77).await);

        let users: &dyn UserRepository = &store;
        let roles = users.find_by_id(user.id).await.unwrap().unwrap().roles;
        assert_eq!(roles.len(), 2);
    }

    #[tokio::test]
    async fn delete_orphans_the_users_posts_in_the_same_step() {
        let (store, user) = store_with_author().await;
        store.insert(draft("a", Category::It, user.id), &user).await.unwrap();
        store.insert(draft("b", Category::Other, user.id), &user).await.unwrap();

        assert_eq!(store.delete(user.id).await.unwrap(), Some(2));
        assert_eq!(store.delete(user.id).await.unwrap(), None);

        let posts = store.find_all_ordered(&SortOrder::new("id", true)).await.unwrap();
        assert!(posts.iter().all(Post::is_orphaned));
    }

    #[tokio::test]
    async fn post_for_deleted_author_is_refused() {
        let (store, user) = store_with_author().await;
        store.delete(user.id).await.unwrap();

        let err = store
            .insert(draft("late", Category::It, user.id), &user)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_inserts_never_leave_a_dangling_author() {
        let (store, user) = store_with_author().await;
        let store = std::sync::Arc::new(store);

        let writers: Vec<_> = (0..32)
            .map(|i| {
                let store = store.clone();
                let user = user.clone();
                tokio::spawn(async move {
                    let _ = store
                        .insert(draft(&format!("p{i}"), Category::It, user.id), &user)
                        .await;
                })
            })
            .collect();
        let deleter = {
            let store = store.clone();
            tokio::spawn(async move { store.delete(user.id).await })
        };

        for writer in writers {
            writer.await.unwrap();
        }
        assert!(deleter.await.unwrap().unwrap().is_some());

        let posts = store.find_all_ordered(&SortOrder::new("id", true)).await.unwrap();
        assert!(posts.iter().all(Post::is_orphaned));
    }
}
