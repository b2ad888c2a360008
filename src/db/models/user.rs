//! User Model
//!
//! Admin/manager accounts. Authentication is out of scope; `password` is
//! stored opaque and never serialized back out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use super::serde_thing;

pub type UserId = Thing;

/// User role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Admin,
    Manager,
}

/// User model
///
/// `push_tokens` is a set maintained by the register-push-token endpoint;
/// duplicates are never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(
        with = "serde_thing::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<UserId>,
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub push_tokens: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert document for a new user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub username: String,
    pub password: String,
    pub role: UserRole,
    pub push_tokens: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl UserCreate {
    pub fn new(username: String, password: String) -> Self {
        Self {
            username,
            password,
            role: UserRole::default(),
            push_tokens: Vec::new(),
            created_at: Utc::now(),
        }
    }
}
