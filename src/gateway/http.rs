//! Blocking HTTP adapter for the payment gateway (Stripe API).
//!
//! All four operations are synchronous request/response against the remote
//! service. Nothing here retries: confirm is not documented idempotent, and
//! an automatic retry could double-charge. Callers must treat every call as
//! potentially failing for transport reasons distinct from a remote-side
//! rejection.

use crate::config::SubwardenConfig;
use crate::errors::SubwardenError;
use crate::gateway::models::{parse_gateway_error, parse_intent, PaymentIntent};
use reqwest::blocking::{Client, Response};
use std::time::Duration;

/// Remote payment operations the core depends on.
///
/// The seam for substituting a test double; the production implementation
/// is [`StripeClient`].
pub trait PaymentGateway: Send + Sync {
    /// Create a new payment intent for `amount` in `currency`.
    fn create_intent(&self, amount: i64, currency: &str) -> Result<PaymentIntent, SubwardenError>;

    /// Fetch the current snapshot of an intent.
    ///
    /// # Errors
    /// `NotFound` if the gateway does not know the id.
    fn retrieve_intent(&self, id: &str) -> Result<PaymentIntent, SubwardenError>;

    /// Confirm an intent with the given payment method, driving it toward
    /// `succeeded` or `failed`.
    fn confirm_intent(
        &self,
        id: &str,
        payment_method: &str,
        return_url: &str,
    ) -> Result<PaymentIntent, SubwardenError>;

    /// Cancel an intent.
    ///
    /// # Errors
    /// `GatewayError` if the intent is already in a terminal state
    /// incompatible with cancellation.
    fn cancel_intent(&self, id: &str) -> Result<PaymentIntent, SubwardenError>;
}

/// Stripe payment-intents client.
pub struct StripeClient {
    client: Client,
    secret_key: String,
    base_url: String,
}

impl StripeClient {
    /// Create a new client from config.
    pub fn new(config: &SubwardenConfig) -> Result<Self, SubwardenError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SubwardenError::Transport(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            client,
            secret_key: config.gateway_secret_key.clone(),
            base_url: "https://api.stripe.com".to_string(),
        })
    }

    /// Create a client against a custom base URL (for testing).
    #[cfg(test)]
    pub fn with_base_url(
        config: &SubwardenConfig,
        base_url: String,
    ) -> Result<Self, SubwardenError> {
        let mut client = Self::new(config)?;
        client.base_url = base_url;
        Ok(client)
    }

    /// Set request timeout with fallible construction.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, SubwardenError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SubwardenError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    fn intents_url(&self, suffix: &str) -> String {
        format!("{}/v1/payment_intents{}", self.base_url, suffix)
    }

    fn handle(&self, response: Response, resource: &str) -> Result<PaymentIntent, SubwardenError> {
        let status = response.status();
        let body = response
            .bytes()
            .map_err(|e| SubwardenError::Transport(format!("Failed to read body: {}", e)))?;

        if status.as_u16() == 404 {
            return Err(SubwardenError::NotFound(resource.to_string()));
        }
        if !status.is_success() {
            return Err(parse_gateway_error(&body, status.as_u16()));
        }

        parse_intent(&body)
    }
}

impl PaymentGateway for StripeClient {
    fn create_intent(&self, amount: i64, currency: &str) -> Result<PaymentIntent, SubwardenError> {
        let params = [
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];

        let response = self
            .client
            .post(self.intents_url(""))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .map_err(|e| SubwardenError::Transport(format!("create intent failed: {}", e)))?;

        self.handle(response, "payment intent")
    }

    fn retrieve_intent(&self, id: &str) -> Result<PaymentIntent, SubwardenError> {
        let response = self
            .client
            .get(self.intents_url(&format!("/{}", id)))
            .bearer_auth(&self.secret_key)
            .send()
            .map_err(|e| SubwardenError::Transport(format!("retrieve intent failed: {}", e)))?;

        self.handle(response, &format!("payment intent {}", id))
    }

    fn confirm_intent(
        &self,
        id: &str,
        payment_method: &str,
        return_url: &str,
    ) -> Result<PaymentIntent, SubwardenError> {
        let params = [
            ("payment_method", payment_method),
            ("return_url", return_url),
        ];

        let response = self
            .client
            .post(self.intents_url(&format!("/{}/confirm", id)))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .map_err(|e| SubwardenError::Transport(format!("confirm intent failed: {}", e)))?;

        self.handle(response, &format!("payment intent {}", id))
    }

    fn cancel_intent(&self, id: &str) -> Result<PaymentIntent, SubwardenError> {
        let response = self
            .client
            .post(self.intents_url(&format!("/{}/cancel", id)))
            .bearer_auth(&self.secret_key)
            .send()
            .map_err(|e| SubwardenError::Transport(format!("cancel intent failed: {}", e)))?;

        self.handle(response, &format!("payment intent {}", id))
    }
}
