//! Data Transfer Objects - request/response types for the API.
//!
//! Query parameter names keep the camelCase spelling clients already use.

use serde::{Deserialize, Serialize};

/// `POST /users/addUser?email=..&password=..`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddUserParams {
    pub email: String,
    pub password: String,
}

/// `?userId=..`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdParams {
    pub user_id: i64,
}

/// `?adminId=..`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminIdParams {
    pub admin_id: i64,
}

/// `GET /posts?fieldName=..&isAscDirection=..`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortParams {
    pub field_name: String,
    pub is_asc_direction: bool,
}

/// `GET /posts/page={i}?pageSize=..`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSizeParams {
    pub page_size: u64,
}

/// `GET /welcome?name=..&lastName=..`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeParams {
    pub name: String,
    pub last_name: String,
}

/// Any scalar a form field may arrive as. Converted to text so that the
/// validator, not the decoder, decides whether it fits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Flag(bool),
}

impl FormValue {
    pub fn into_text(self) -> String {
        match self {
            FormValue::Text(text) => text,
            FormValue::Integer(n) => n.to_string(),
            FormValue::Decimal(n) => n.to_string(),
            FormValue::Flag(b) => b.to_string(),
        }
    }
}

/// Post submission body. Every field is optional and loosely typed so that
/// missing or mistyped values surface as field errors rather than a
/// rejected body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: Option<FormValue>,
    #[serde(default)]
    pub content: Option<FormValue>,
    #[serde(default)]
    pub category: Option<FormValue>,
    #[serde(default, alias = "authorId")]
    pub author_id: Option<FormValue>,
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrorResponse {
    pub field: String,
    pub message: String,
}

/// Outcome of `POST /posts/addPost`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSubmissionResponse {
    pub created: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldErrorResponse>,
}

impl PostSubmissionResponse {
    pub fn created() -> Self {
        Self {
            created: true,
            errors: Vec::new(),
        }
    }

    pub fn rejected(errors: Vec<FieldErrorResponse>) -> Self {
        Self {
            created: false,
            errors,
        }
    }
}
