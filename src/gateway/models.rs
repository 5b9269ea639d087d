//! Payment gateway wire models.
//!
//! The gateway is an opaque remote service; these structs capture only the
//! slice of its responses the core acts on. Unknown response fields are
//! ignored, unknown statuses are normalized to [`IntentStatus::Unknown`].

use crate::SubwardenError;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a gateway payment intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    /// Intent created, no payment attempted yet.
    Created,
    /// Awaiting an explicit confirm call.
    RequiresConfirmation,
    /// Payment completed successfully.
    Succeeded,
    /// Intent canceled at the gateway.
    Canceled,
    /// Payment attempt failed.
    Failed,
    /// Any status outside the contract. Never treated as successful.
    #[serde(other)]
    Unknown,
}

impl IntentStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentStatus::Created => "created",
            IntentStatus::RequiresConfirmation => "requires_confirmation",
            IntentStatus::Succeeded => "succeeded",
            IntentStatus::Canceled => "canceled",
            IntentStatus::Failed => "failed",
            IntentStatus::Unknown => "unknown",
        }
    }

    /// Whether the gateway reports the payment as completed.
    pub fn is_succeeded(&self) -> bool {
        matches!(self, IntentStatus::Succeeded)
    }
}

/// Snapshot of one gateway payment intent.
///
/// Owned by the gateway; the core reads and transitions it through gateway
/// calls only, and never stores it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Gateway-assigned opaque id.
    pub id: String,

    /// Amount in the currency's minor unit.
    pub amount: i64,

    /// ISO currency code, lowercase.
    pub currency: String,

    /// Current lifecycle status.
    pub status: IntentStatus,
}

/// Error envelope returned by the gateway on a rejected call.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayErrorEnvelope {
    /// The error payload.
    pub error: GatewayErrorBody,
}

/// Error payload inside [`GatewayErrorEnvelope`].
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayErrorBody {
    /// Human-readable message from the gateway.
    #[serde(default)]
    pub message: Option<String>,

    /// Gateway error category.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Gateway error code.
    #[serde(default)]
    pub code: Option<String>,
}

/// Parse a successful gateway response body into a [`PaymentIntent`].
pub fn parse_intent(body: &[u8]) -> Result<PaymentIntent, SubwardenError> {
    serde_json::from_slice(body).map_err(|e| {
        SubwardenError::GatewayError(format!("unparseable gateway response: {}", e))
    })
}

/// Turn a non-2xx gateway response body into the matching error.
///
/// Carries the gateway's own message where it provides one, falling back to
/// the HTTP status.
pub fn parse_gateway_error(body: &[u8], http_status: u16) -> SubwardenError {
    let message = serde_json::from_slice::<GatewayErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| format!("HTTP {}", http_status));
    SubwardenError::GatewayError(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATED_INTENT: &str = r#"{
        "id": "pi_3MtwBwLkdIwHu7ix28a3tqPa",
        "object": "payment_intent",
        "amount": 2000,
        "currency": "usd",
        "status": "created",
        "client_secret": "pi_3MtwBwLkdIwHu7ix28a3tqPa_secret"
    }"#;

    const SUCCEEDED_INTENT: &str = r#"{
        "id": "pi_3MtwBwLkdIwHu7ix28a3tqPa",
        "amount": 2000,
        "currency": "usd",
        "status": "succeeded"
    }"#;

    const ERROR_BODY: &str = r#"{
        "error": {
            "message": "You cannot cancel this PaymentIntent because it has a status of canceled.",
            "type": "invalid_request_error",
            "code": "payment_intent_unexpected_state"
        }
    }"#;

    #[test]
    fn parse_intent_ignores_unknown_fields() {
        let intent = parse_intent(CREATED_INTENT.as_bytes()).unwrap();
        assert_eq!(intent.id, "pi_3MtwBwLkdIwHu7ix28a3tqPa");
        assert_eq!(intent.amount, 2000);
        assert_eq!(intent.currency, "usd");
        assert_eq!(intent.status, IntentStatus::Created);
    }

    #[test]
    fn parse_succeeded_intent() {
        let intent = parse_intent(SUCCEEDED_INTENT.as_bytes()).unwrap();
        assert!(intent.status.is_succeeded());
    }

    #[test]
    fn unknown_status_is_normalized_not_rejected() {
        let body = r#"{"id":"pi_1","amount":1,"currency":"usd","status":"requires_capture"}"#;
        let intent = parse_intent(body.as_bytes()).unwrap();
        assert_eq!(intent.status, IntentStatus::Unknown);
        assert!(!intent.status.is_succeeded());
    }

    #[test]
    fn parse_malformed_body() {
        let result = parse_intent(b"not json");
        assert!(matches!(result, Err(SubwardenError::GatewayError(_))));
    }

    #[test]
    fn gateway_error_carries_remote_message() {
        let err = parse_gateway_error(ERROR_BODY.as_bytes(), 400);
        match err {
            SubwardenError::GatewayError(message) => {
                assert!(message.contains("cannot cancel"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn gateway_error_falls_back_to_http_status() {
        let err = parse_gateway_error(b"<html>bad gateway</html>", 502);
        match err {
            SubwardenError::GatewayError(message) => assert_eq!(message, "HTTP 502"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn status_round_trips_through_serde() {
        for status in [
            IntentStatus::Created,
            IntentStatus::RequiresConfirmation,
            IntentStatus::Succeeded,
            IntentStatus::Canceled,
            IntentStatus::Failed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: IntentStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }
}
