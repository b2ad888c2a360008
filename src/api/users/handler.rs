//! User API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::db::repository::{RepoError, UserRepository};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPushToken {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// POST /api/users/register-push-token
///
/// Idempotent: registering the same token twice leaves one copy.
pub async fn register_push_token(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterPushToken>,
) -> AppResult<Json<Value>> {
    let (user_id, token) = match (payload.user_id, payload.token) {
        (Some(user_id), Some(token)) if !user_id.is_empty() && !token.is_empty() => {
            (user_id, token)
        }
        _ => return Err(AppError::invalid("User ID and token are required.")),
    };

    let repo = UserRepository::new(state.db.clone());
    match repo.add_push_token(&user_id, &token).await {
        Ok(_) => Ok(Json(json!({
            "message": "Push token registered successfully."
        }))),
        Err(RepoError::NotFound(_)) => Err(AppError::not_found("User not found.")),
        Err(e) => Err(e.into()),
    }
}
