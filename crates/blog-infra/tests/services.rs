//! Service flows over the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use rstest::rstest;

use blog_core::domain::{ADMIN_ROLE_ID, DEFAULT_ROLE_ID, Role, User};
use blog_core::error::{DomainError, RepoError};
use blog_core::ports::{BaseRepository, PostRepository, UserRepository};
use blog_core::query::{PageRequest, SortOrder};
use blog_core::services::{PostService, PostSubmissionOutcome, RoleService, UserService};
use blog_core::validation::PostSubmission;
use blog_infra::{Argon2PasswordService, InMemoryStore};

struct Blog {
    store: Arc<InMemoryStore>,
    users: UserService,
    roles: RoleService,
    posts: PostService,
}

fn blog() -> Blog {
    let store = Arc::new(InMemoryStore::with_default_roles());
    Blog {
        users: UserService::new(
            store.clone(),
            store.clone(),
            Arc::new(Argon2PasswordService::new()),
        ),
        roles: RoleService::new(store.clone()),
        posts: PostService::new(store.clone(), store.clone(), store.clone()),
        store,
    }
}

fn submission(title: &str, category: &str, author_id: i64) -> PostSubmission {
    PostSubmission {
        title: Some(title.to_string()),
        content: Some("Some content".to_string()),
        category: Some(category.to_string()),
        author_id: Some(author_id.to_string()),
    }
}

async fn add_posts(blog: &Blog, author: &User, count: usize) {
    for i in 0..count {
        let outcome = blog
            .posts
            .add_post(submission(&format!("post {i}"), "IT", author.id))
            .await
            .unwrap();
        assert!(outcome.is_created());
    }
}

async fn author_of(blog: &Blog, post_id: i64) -> Option<i64> {
    let posts: &dyn PostRepository = &*blog.store;
    posts.find_by_id(post_id).await.unwrap().unwrap().author_id
}

#[tokio::test]
async fn add_user_assigns_exactly_the_default_role() {
    let blog = blog();
    let user = blog.users.add_user("w@w.pl", "qqq").await.unwrap();

    assert_eq!(user.email, "w@w.pl");
    assert_ne!(user.password_hash, "qqq");
    assert!(!user.active);
    let role_ids: Vec<_> = user.roles.iter().map(|r| r.id).collect();
    assert_eq!(role_ids, vec![DEFAULT_ROLE_ID]);
}

#[tokio::test]
async fn duplicate_signup_is_a_constraint_error() {
    let blog = blog();
    blog.users.add_user("w@w.pl", "qqq").await.unwrap();

    let err = blog.users.add_user("w@w.pl", "other").await.unwrap_err();
    assert!(matches!(err, DomainError::Repository(RepoError::Constraint(_))));
}

#[tokio::test]
async fn activation_moves_inactive_user_to_active_and_back() {
    let blog = blog();
    let user = blog.users.add_user("w@w.pl", "qqq").await.unwrap();

    assert!(blog.users.activate(user.id).await.unwrap());
    assert!(blog.users.activate(user.id).await.unwrap());
    assert!(blog.users.get_user(user.id).await.unwrap().unwrap().active);

    assert!(blog.users.deactivate(user.id).await.unwrap());
    assert!(!blog.users.get_user(user.id).await.unwrap().unwrap().active);
    assert!(!blog.users.activate(404).await.unwrap());
}

#[tokio::test]
async fn roles_are_looked_up_by_id() {
    let blog = blog();
    let admin = blog.roles.get_role(ADMIN_ROLE_ID).await.unwrap().unwrap();
    assert_eq!(admin.name, "ROLE_ADMIN");
    assert!(blog.roles.get_role(9).await.unwrap().is_none());
}

#[tokio::test]
async fn post_for_unknown_author_is_rejected_on_author_field() {
    let blog = blog();
    let outcome = blog.posts.add_post(submission("t", "IT", 12)).await.unwrap();

    match outcome {
        PostSubmissionOutcome::Rejected(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "author_id");
        }
        PostSubmissionOutcome::Created(post) => panic!("unexpected post {post:?}"),
    }
}

/// Still finds one user that the post store has already dropped, the way a
/// lookup does when a delete commits just after it.
struct StaleUsers(User);

#[async_trait]
impl BaseRepository<User, i64> for StaleUsers {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok((id == self.0.id).then(|| self.0.clone()))
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        Ok(vec![self.0.clone()])
    }
}

#[async_trait]
impl UserRepository for StaleUsers {
    async fn insert_with_role(&self, user: User, _role: &Role) -> Result<User, RepoError> {
        Ok(user)
    }

    async fn activate(&self, _id: i64) -> Result<bool, RepoError> {
        Ok(false)
    }

    async fn deactivate(&self, _id: i64) -> Result<bool, RepoError> {
        Ok(false)
    }

    async fn delete(&self, _id: i64) -> Result<Option<u64>, RepoError> {
        Ok(None)
    }
}

#[tokio::test]
async fn author_deleted_after_lookup_is_rejected_on_author_field() {
    let blog = blog();
    let author = blog.users.add_user("gone@example.com", "pw").await.unwrap();
    assert!(blog.users.delete_user(author.id).await.unwrap());

    let posts = PostService::new(
        blog.store.clone(),
        Arc::new(StaleUsers(author.clone())),
        blog.store.clone(),
    );
    let outcome = posts.add_post(submission("late", "IT", author.id)).await.unwrap();

    match outcome {
        PostSubmissionOutcome::Rejected(errors) => {
            assert_eq!(errors[0].field, "author_id");
            assert_eq!(errors[0].message, format!("no user with id {}", author.id));
        }
        PostSubmissionOutcome::Created(post) => panic!("post kept a dangling author: {post:?}"),
    }
    let all: &dyn PostRepository = &*blog.store;
    assert!(all.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_post_is_rejected_with_field_errors() {
    let blog = blog();
    let outcome = blog
        .posts
        .add_post(PostSubmission::default())
        .await
        .unwrap();
    assert!(matches!(outcome, PostSubmissionOutcome::Rejected(errors) if errors.len() == 4));
}

#[rstest]
#[case(0, 10)]
#[case(1, 10)]
#[case(2, 5)]
#[case(3, 0)]
#[tokio::test]
async fn twenty_five_posts_paginate_by_ten(#[case] index: u64, #[case] expected: usize) {
    let blog = blog();
    let author = blog.users.add_user("w@w.pl", "qqq").await.unwrap();
    add_posts(&blog, &author, 25).await;

    let page = blog
        .posts
        .posts_page(PageRequest::new(index, 10).unwrap())
        .await
        .unwrap();

    assert_eq!(page.content.len(), expected);
    assert_eq!(page.total_elements, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page_index, index);
}

#[tokio::test]
async fn descending_id_order_is_non_increasing() {
    let blog = blog();
    let author = blog.users.add_user("w@w.pl", "qqq").await.unwrap();
    add_posts(&blog, &author, 5).await;

    let posts = blog
        .posts
        .posts_ordered(&SortOrder::new("id", false))
        .await
        .unwrap();

    assert_eq!(posts.len(), 5);
    assert!(posts.windows(2).all(|w| w[0].id >= w[1].id));
}

#[tokio::test]
async fn unknown_sort_field_propagates_from_store() {
    let blog = blog();
    let err = blog
        .posts
        .posts_ordered(&SortOrder::new("nope", true))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Repository(RepoError::InvalidField(_))));
}

#[tokio::test]
async fn statistics_count_posts_per_category() {
    let blog = blog();
    let author = blog.users.add_user("w@w.pl", "qqq").await.unwrap();
    for (title, category) in [("a", "IT"), ("b", "DEVOPS"), ("c", "devops")] {
        blog.posts
            .add_post(submission(title, category, author.id))
            .await
            .unwrap();
    }

    let stats = blog.posts.category_statistics().await.unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats["IT"], 1);
    assert_eq!(stats["DEVOPS"], 2);
}

#[tokio::test]
async fn deleting_an_author_orphans_posts_until_an_admin_takes_them() {
    let blog = blog();
    let author = blog.users.add_user("author@blog.dev", "qqq").await.unwrap();
    let bystander = blog.users.add_user("other@blog.dev", "qqq").await.unwrap();
    let admin = blog.users.add_user("admin@blog.dev", "qqq").await.unwrap();
    assert!(blog.store.grant_role(admin.id, ADMIN_ROLE_ID).await);

    add_posts(&blog, &author, 2).await;
    add_posts(&blog, &bystander, 1).await;

    assert!(blog.users.delete_user(author.id).await.unwrap());
    assert!(blog.users.get_user(author.id).await.unwrap().is_none());
    assert_eq!(author_of(&blog, 1).await, None);
    assert_eq!(author_of(&blog, 2).await, None);
    assert_eq!(author_of(&blog, 3).await, Some(bystander.id));

    // Without the admin role nothing moves.
    assert!(!blog.posts.reassign_orphaned_posts(bystander.id).await.unwrap());
    assert_eq!(author_of(&blog, 1).await, None);

    assert!(blog.posts.reassign_orphaned_posts(admin.id).await.unwrap());
    assert_eq!(author_of(&blog, 1).await, Some(admin.id));
    assert_eq!(author_of(&blog, 2).await, Some(admin.id));
    assert_eq!(author_of(&blog, 3).await, Some(bystander.id));
}

#[tokio::test]
async fn reassignment_by_unknown_user_reports_false() {
    let blog = blog();
    assert!(!blog.posts.reassign_orphaned_posts(31).await.unwrap());
}

#[tokio::test]
async fn deleting_unknown_user_reports_false() {
    let blog = blog();
    assert!(!blog.users.delete_user(31).await.unwrap());
}
