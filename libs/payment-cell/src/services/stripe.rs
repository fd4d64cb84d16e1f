use reqwest::Client;
use tracing::{debug, error, info};
use uuid::Uuid;

use shared_config::AppConfig;

use crate::models::{PaymentError, PaymentIntent};

/// Minimal Stripe REST client: payment intents only.
pub struct StripeClient {
    client: Client,
    api_base: String,
    secret_key: String,
}

impl StripeClient {
    pub fn new(config: &AppConfig) -> Result<Self, PaymentError> {
        if !config.is_payment_configured() {
            return Err(PaymentError::NotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            api_base: config.stripe_api_base.trim_end_matches('/').to_string(),
            secret_key: config.stripe_secret_key.clone(),
        })
    }

    /// POST /v1/payment_intents
    pub async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
        appointment_id: Uuid,
        user_id: Uuid,
    ) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.api_base);
        let form = [
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
            ("metadata[appointmentId]", appointment_id.to_string()),
            ("metadata[userId]", user_id.to_string()),
        ];

        debug!("Creating payment intent at {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!("Stripe payment intent creation failed: {} - {}", status, response_text);
            return Err(PaymentError::StripeApiError {
                message: format!("HTTP {}: {}", status, response_text),
            });
        }

        let intent: PaymentIntent = serde_json::from_str(&response_text).map_err(|e| PaymentError::StripeApiError {
            message: format!("Failed to parse payment intent: {}", e),
        })?;

        info!("Created payment intent {} for appointment {}", intent.id, appointment_id);
        Ok(intent)
    }
}
