//! Payment API module

pub mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/payment",
        Router::new().route(
            "/create-payment-intent",
            post(handler::create_payment_intent),
        ),
    )
}
