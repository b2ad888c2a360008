//! User Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{User, UserCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let pure_id = strip_table_prefix(USER_TABLE, id);
        let user: Option<User> = self.base.db().select((USER_TABLE, pure_id)).await?;
        Ok(user)
    }

    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let created: Option<User> = self.base.db().create(USER_TABLE).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Append a push token to the user's set; already-present tokens are a
    /// no-op. UPDATE does not create missing records, so an unknown user
    /// surfaces as NotFound.
    ///
    /// `$token` is a protected built-in variable, so the bind uses
    /// `$push_token`.
    pub async fn add_push_token(&self, id: &str, token: &str) -> RepoResult<User> {
        let pure_id = strip_table_prefix(USER_TABLE, id).to_string();
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE type::thing('user', $id) \
                 SET pushTokens = array::union(pushTokens ?? [], [$push_token]) \
                 RETURN AFTER",
            )
            .bind(("id", pure_id))
            .bind(("push_token", token.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }
}
