//! Payment API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

fn default_currency() -> String {
    "usd".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentIntent {
    pub amount: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// POST /api/payment/create-payment-intent
pub async fn create_payment_intent(
    State(state): State<ServerState>,
    Json(payload): Json<CreatePaymentIntent>,
) -> AppResult<Json<Value>> {
    let client = state
        .payments
        .as_ref()
        .ok_or_else(|| AppError::internal("Stripe service not available."))?;

    let client_secret = client
        .create_payment_intent(payload.amount, &payload.currency)
        .await?;

    Ok(Json(json!({ "clientSecret": client_secret })))
}
