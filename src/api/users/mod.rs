//! User API module

pub mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/users",
        Router::new().route("/register-push-token", post(handler::register_push_token)),
    )
}
