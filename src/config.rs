//! Subwarden configuration.

use crate::SubwardenError;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::time::Duration;

/// Configuration for token issuance, request gating, and gateway access.
///
/// Constructed once at process start and shared by read-only reference
/// afterwards; nothing in this struct is mutated after init. Rotating the
/// signing secret requires a restart and invalidates all outstanding tokens.
#[derive(Debug, Clone)]
pub struct SubwardenConfig {
    /// Base64-encoded symmetric signing secret for bearer tokens.
    /// The HMAC key is derived from it exactly once, at codec construction.
    pub signing_secret_b64: String,

    /// How long an issued token remains valid. Typically configured in
    /// milliseconds upstream; build with `Duration::from_millis`.
    pub token_ttl: Duration,

    /// Client origin allowed by the transport layer. Held here so the whole
    /// configuration surface is read once at startup; the core never acts
    /// on it.
    pub allowed_origin: String,

    /// Payment gateway secret key (Stripe `sk_...`).
    pub gateway_secret_key: String,
}

impl SubwardenConfig {
    /// Validate configuration for obvious errors.
    pub fn validate(&self) -> Result<(), SubwardenError> {
        if self.signing_secret_b64.is_empty() {
            return Err(SubwardenError::ConfigError(
                "signing_secret_b64 cannot be empty".to_string(),
            ));
        }
        if STANDARD.decode(&self.signing_secret_b64).is_err() {
            return Err(SubwardenError::ConfigError(
                "signing_secret_b64 is not valid base64".to_string(),
            ));
        }
        if self.token_ttl.is_zero() {
            return Err(SubwardenError::ConfigError(
                "token_ttl must be positive".to_string(),
            ));
        }
        if self.gateway_secret_key.is_empty() {
            return Err(SubwardenError::ConfigError(
                "gateway_secret_key cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
