use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    It,
    DevOps,
    Database,
    Security,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::It,
        Category::DevOps,
        Category::Database,
        Category::Security,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::It => "IT",
            Category::DevOps => "DEVOPS",
            Category::Database => "DATABASE",
            Category::Security => "SECURITY",
            Category::Other => "OTHER",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// Post entity - represents a blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: Category,
    /// `None` once the author has been removed and before reassignment.
    pub author_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn is_orphaned(&self) -> bool {
        self.author_id.is_none()
    }
}

/// A validated post submission, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub category: Category,
    pub author_id: i64,
}
