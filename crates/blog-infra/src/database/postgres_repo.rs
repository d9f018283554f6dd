//! PostgreSQL repository implementations.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, EntityTrait, NotSet, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use blog_core::domain::{Post, PostDraft, Role, User};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository, RoleRepository, UserRepository};
use blog_core::query::{Page, PageRequest, SortDirection, SortOrder};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::role::Entity as RoleEntity;
use super::entity::user::{self, Entity as UserEntity};
use super::entity::user_role::{self, Entity as UserRoleEntity};
use super::postgres_base::{PostgresBaseRepository, query_error, save_error};

/// PostgreSQL role repository.
pub type PostgresRoleRepository = PostgresBaseRepository<RoleEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL user repository. Users are always loaded with their roles.
pub struct PostgresUserRepository {
    db: Arc<DbConn>,
}

impl PostgresUserRepository {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }
}

fn order_of(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}

#[async_trait]
impl BaseRepository<User, i64> for PostgresUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_id = id, "Finding user by id");

        let mut rows = UserEntity::find_by_id(id)
            .find_with_related(RoleEntity)
            .all(self.db.as_ref())
            .await
            .map_err(query_error)?;

        Ok(rows.pop().map(|(user, roles)| user.into_domain(roles)))
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let rows = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .find_with_related(RoleEntity)
            .all(self.db.as_ref())
            .await
            .map_err(query_error)?;

        Ok(rows
            .into_iter()
            .map(|(user, roles)| user.into_domain(roles))
            .collect())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert_with_role(&self, user: User, role: &Role) -> Result<User, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        let model = user::ActiveModel {
            id: NotSet,
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            active: Set(user.active),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        }
        .insert(&txn)
        .await
        .map_err(save_error)?;

        user_role::ActiveModel {
            user_id: Set(model.id),
            role_id: Set(role.id),
        }
        .insert(&txn)
        .await
        .map_err(save_error)?;

        txn.commit().await.map_err(query_error)?;

        let mut saved = model.into_domain(Vec::new());
        saved.roles.push(role.clone());
        Ok(saved)
    }

    async fn activate(&self, id: i64) -> Result<bool, RepoError> {
        set_active(self.db.as_ref(), id, true).await
    }

    async fn deactivate(&self, id: i64) -> Result<bool, RepoError> {
        set_active(self.db.as_ref(), id, false).await
    }

    async fn delete(&self, id: i64) -> Result<Option<u64>, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        // Row lock blocks post inserts naming this author until commit
        let found = UserEntity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(query_error)?;
        if found.is_none() {
            txn.rollback().await.map_err(query_error)?;
            return Ok(None);
        }

        let orphaned = nullify_author(&txn, id).await?;

        UserRoleEntity::delete_many()
            .filter(user_role::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(query_error)?;

        UserEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(query_error)?;

        txn.commit().await.map_err(query_error)?;
        Ok(Some(orphaned))
    }
}

/// Clear the author of every post written by `user_id`.
async fn nullify_author<C: ConnectionTrait>(db: &C, user_id: i64) -> Result<u64, RepoError> {
    let result = PostEntity::update_many()
        .col_expr(post::Column::AuthorId, Expr::value(Option::<i64>::None))
        .filter(post::Column::AuthorId.eq(user_id))
        .exec(db)
        .await
        .map_err(query_error)?;

    Ok(result.rows_affected)
}

async fn set_active(db: &DbConn, id: i64, active: bool) -> Result<bool, RepoError> {
    let result = UserEntity::update_many()
        .col_expr(user::Column::Active, Expr::value(active))
        .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
        .filter(user::Column::Id.eq(id))
        .exec(db)
        .await
        .map_err(query_error)?;

    Ok(result.rows_affected > 0)
}

impl RoleRepository for PostgresRoleRepository {}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, draft: PostDraft, author: &User) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        let author_row = UserEntity::find_by_id(author.id)
            .lock_shared()
            .one(&txn)
            .await
            .map_err(query_error)?;
        if author_row.is_none() {
            txn.rollback().await.map_err(query_error)?;
            return Err(RepoError::Constraint(format!("unknown author {}", author.id)));
        }

        let model = post::ActiveModel {
            id: NotSet,
            title: Set(draft.title),
            content: Set(draft.content),
            category: Set(draft.category.into()),
            author_id: Set(Some(author.id)),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(&txn)
        .await
        .map_err(save_error)?;

        txn.commit().await.map_err(query_error)?;
        Ok(model.into())
    }

    async fn find_all_ordered(&self, order: &SortOrder) -> Result<Vec<Post>, RepoError> {
        let column = post::Column::from_str(&order.field)
            .map_err(|_| RepoError::InvalidField(order.field.clone()))?;

        let rows = PostEntity::find()
            .order_by(column, order_of(order.direction))
            .all(self.db.as_ref())
            .await
            .map_err(query_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_page(&self, request: PageRequest) -> Result<Page<Post>, RepoError> {
        let total = PostEntity::find()
            .count(self.db.as_ref())
            .await
            .map_err(query_error)?;

        // Past the last row, or an offset that does not fit in u64
        let offset = match request.index().checked_mul(request.size()) {
            Some(offset) if offset < total => offset,
            _ => return Ok(Page::new(Vec::new(), request, total)),
        };

        let rows = PostEntity::find()
            .order_by_asc(post::Column::Id)
            .offset(offset)
            .limit(request.size())
            .all(self.db.as_ref())
            .await
            .map_err(query_error)?;

        Ok(Page::new(
            rows.into_iter().map(Into::into).collect(),
            request,
            total,
        ))
    }

    async fn reassign_orphaned(&self, admin_id: i64) -> Result<u64, RepoError> {
        let result = PostEntity::update_many()
            .col_expr(post::Column::AuthorId, Expr::value(admin_id))
            .filter(post::Column::AuthorId.is_null())
            .exec(self.db.as_ref())
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected)
    }

    async fn category_counts(&self) -> Result<Vec<(String, i64)>, RepoError> {
        PostEntity::find()
            .select_only()
            .column(post::Column::Category)
            .column_as(Expr::col(post::Column::Id).count(), "count")
            .group_by(post::Column::Category)
            .into_tuple::<(String, i64)>()
            .all(self.db.as_ref())
            .await
            .map_err(query_error)
    }
}
