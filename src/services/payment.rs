//! Payment Intent Client
//!
//! Thin proxy to the Stripe payment-intents API. Order placement never
//! depends on this; the client is only constructed when a secret key is
//! configured, and the endpoint reports the service unavailable otherwise.

use serde::Deserialize;

use crate::utils::AppError;

const DEFAULT_API_BASE: &str = "https://api.stripe.com";

#[derive(Debug, Deserialize)]
struct PaymentIntentResponse {
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: String,
}

#[derive(Clone)]
pub struct PaymentClient {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl PaymentClient {
    pub fn new(secret_key: String) -> Self {
        Self::with_api_base(secret_key, DEFAULT_API_BASE.to_string())
    }

    /// Override the API base URL (used against a stub server in tests)
    pub fn with_api_base(secret_key: String, api_base: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            api_base,
        }
    }

    /// Create a card payment intent and return its client secret
    pub async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<String, AppError> {
        let params = [
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Payment request failed: {e}")))?;

        if !response.status().is_success() {
            let message = match response.json::<StripeErrorBody>().await {
                Ok(body) => body.error.message,
                Err(_) => "Payment provider rejected the request.".to_string(),
            };
            return Err(AppError::internal(message));
        }

        let intent: PaymentIntentResponse = response
            .json()
            .await
            .map_err(|e| AppError::internal(format!("Invalid payment response: {e}")))?;

        Ok(intent.client_secret)
    }
}
