//! Post entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;

use blog_core::domain::Category as DomainCategory;

/// Category stored as a short string code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Category {
    #[sea_orm(string_value = "IT")]
    It,
    #[sea_orm(string_value = "DEVOPS")]
    DevOps,
    #[sea_orm(string_value = "DATABASE")]
    Database,
    #[sea_orm(string_value = "SECURITY")]
    Security,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

impl From<DomainCategory> for Category {
    fn from(category: DomainCategory) -> Self {
        match category {
            DomainCategory::It => Self::It,
            DomainCategory::DevOps => Self::DevOps,
            DomainCategory::Database => Self::Database,
            DomainCategory::Security => Self::Security,
            DomainCategory::Other => Self::Other,
        }
    }
}

impl From<Category> for DomainCategory {
    fn from(category: Category) -> Self {
        match category {
            Category::It => Self::It,
            Category::DevOps => Self::DevOps,
            Category::Database => Self::Database,
            Category::Security => Self::Security,
            Category::Other => Self::Other,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub category: Category,
    pub author_id: Option<i64>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for blog_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            category: model.category.into(),
            author_id: model.author_id,
            created_at: model.created_at.into(),
        }
    }
}
