use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::{ADMIN_ROLE_ID, Post};
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, PostRepository, RoleRepository, UserRepository};
use crate::query::{Page, PageRequest, SortOrder};
use crate::resource::build_statistics;
use crate::validation::{FieldError, PostSubmission};

/// Result of a post submission. Rejections are data, not errors.
#[derive(Debug, Clone)]
pub enum PostSubmissionOutcome {
    Created(Post),
    Rejected(Vec<FieldError>),
}

impl PostSubmissionOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

fn unknown_author(author_id: i64) -> PostSubmissionOutcome {
    PostSubmissionOutcome::Rejected(vec![FieldError::new(
        "author_id",
        format!("no user with id {author_id}"),
    )])
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
    ) -> Self {
        Self {
            posts,
            users,
            roles,
        }
    }

    /// Validate and store a post. An unknown author is reported as a
    /// rejection on `author_id`.
    pub async fn add_post(
        &self,
        submission: PostSubmission,
    ) -> Result<PostSubmissionOutcome, DomainError> {
        let draft = match submission.validate() {
            Ok(draft) => draft,
            Err(errors) => {
                for error in &errors.0 {
                    tracing::debug!(field = error.field, message = %error.message, "Post field rejected");
                }
                return Ok(PostSubmissionOutcome::Rejected(errors.into_inner()));
            }
        };

        let author_id = draft.author_id;
        let Some(author) = self.users.find_by_id(author_id).await? else {
            tracing::warn!(author_id, "Post submitted for unknown author");
            return Ok(unknown_author(author_id));
        };

        match self.posts.insert(draft, &author).await {
            Ok(post) => {
                tracing::info!(post_id = post.id, author_id, "Post created");
                Ok(PostSubmissionOutcome::Created(post))
            }
            // The author was removed between lookup and insert
            Err(RepoError::Constraint(reason)) => {
                tracing::warn!(author_id, %reason, "Post insert refused");
                Ok(unknown_author(author_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn posts_ordered(&self, order: &SortOrder) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.find_all_ordered(order).await?)
    }

    pub async fn posts_page(&self, request: PageRequest) -> Result<Page<Post>, DomainError> {
        Ok(self.posts.find_page(request).await?)
    }

    pub async fn category_statistics(&self) -> Result<BTreeMap<String, i64>, DomainError> {
        let rows = self.posts.category_counts().await?;
        Ok(build_statistics(rows))
    }

    /// Hand every orphaned post to `admin_id`, provided that user holds the
    /// admin role. Returns `false` and changes nothing otherwise.
    pub async fn reassign_orphaned_posts(&self, admin_id: i64) -> Result<bool, DomainError> {
        let Some(admin) = self.users.find_by_id(admin_id).await? else {
            tracing::warn!(admin_id, "Reassignment requested by unknown user");
            return Ok(false);
        };

        let Some(required) = self.roles.find_by_id(ADMIN_ROLE_ID).await? else {
            tracing::warn!(role_id = ADMIN_ROLE_ID, "Admin role is not configured");
            return Ok(false);
        };

        if !admin.has_role(required.id) {
            tracing::warn!(admin_id, role = %required.name, "Reassignment denied, role missing");
            return Ok(false);
        }

        let reassigned = self.posts.reassign_orphaned(admin.id).await?;
        tracing::info!(admin_id, reassigned, "Orphaned posts reassigned");
        Ok(true)
    }
}
