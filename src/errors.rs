//! Subwarden error types.

use thiserror::Error;

/// Errors produced when decoding a bearer token.
///
/// These never cross the request boundary: the gate collapses every variant
/// into [`SubwardenError::Unauthenticated`] and keeps the reason in the logs.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token string cannot be parsed into the expected structure.
    #[error("token is malformed: {0}")]
    Malformed(String),

    /// The token signature does not verify against the signing key.
    #[error("token signature verification failed")]
    InvalidSignature,

    /// The token's expiry instant has passed.
    #[error("token expired {expired_for_seconds}s ago")]
    Expired {
        /// Seconds elapsed since the token's `exp` claim.
        expired_for_seconds: i64,
    },
}

/// Errors that can occur during request gating, gateway calls, and
/// subscription reconciliation.
#[derive(Debug, Error)]
pub enum SubwardenError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A token was requested for an empty subject.
    #[error("token subject cannot be empty")]
    EmptySubject,

    /// Request carries no usable identity (missing, malformed, or expired
    /// token). Deliberately detail-free.
    #[error("authentication required")]
    Unauthenticated,

    /// The authenticated identity does not own the targeted resource.
    #[error("subject {subject} does not own this subscription")]
    Forbidden {
        /// The subject that attempted the operation.
        subject: String,
    },

    /// Unknown gateway resource or unknown local user/subscription.
    #[error("not found: {0}")]
    NotFound(String),

    /// The payment gateway rejected the operation (business failure reported
    /// by the remote side).
    #[error("payment gateway error: {0}")]
    GatewayError(String),

    /// The payment gateway could not be reached (transient network failure,
    /// distinct from a remote-side rejection).
    #[error("payment gateway transport error: {0}")]
    Transport(String),

    /// Local subscription update failed after the gateway already confirmed
    /// the payment. The most severe case: the gateway believes payment
    /// succeeded while local state does not reflect it.
    #[error("subscription reconciliation failed: {0}")]
    ReconciliationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_message_carries_no_detail() {
        let err = SubwardenError::Unauthenticated;
        assert_eq!(err.to_string(), "authentication required");
    }

    #[test]
    fn token_errors_format() {
        let err = TokenError::Expired {
            expired_for_seconds: 42,
        };
        assert_eq!(err.to_string(), "token expired 42s ago");

        let err = TokenError::Malformed("not a jwt".to_string());
        assert!(err.to_string().contains("not a jwt"));
    }

    #[test]
    fn forbidden_names_the_subject() {
        let err = SubwardenError::Forbidden {
            subject: "mallory".to_string(),
        };
        assert!(err.to_string().contains("mallory"));
    }
}
