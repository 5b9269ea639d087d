//! Request interception: bearer extraction and identity binding.
//!
//! The gate is stateless per request — one identity value is produced per
//! call and nothing is shared mutably between requests, so a single gate
//! can serve arbitrarily many concurrent requests.

use crate::clock::Clock;
use crate::errors::SubwardenError;
use crate::gate::paths::PublicPaths;
use crate::token::codec::TokenCodec;
use std::sync::Arc;
use tracing::warn;

/// Authenticated identity bound to one request.
///
/// Passed explicitly through the call chain; there is no thread-local
/// security context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    /// The token subject (username).
    pub subject: String,
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// Returns `None` for any other scheme or an empty token.
pub fn extract_bearer(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Gate deciding, per request, whether it may proceed and as whom.
pub struct RequestGate {
    codec: Arc<TokenCodec>,
    paths: PublicPaths,
    clock: Arc<dyn Clock>,
}

impl RequestGate {
    /// Build a gate over a token codec and a public-path allowlist.
    pub fn new(codec: Arc<TokenCodec>, paths: PublicPaths, clock: Arc<dyn Clock>) -> Self {
        Self {
            codec,
            paths,
            clock,
        }
    }

    /// Authorize one inbound request.
    ///
    /// * Public path: passes without touching the header; `Ok(None)`.
    /// * Protected path, valid bearer token: `Ok(Some(identity))`.
    /// * Protected path otherwise: `Unauthenticated`. The decode failure
    ///   reason is logged internally and never surfaced to the caller.
    pub fn authorize(
        &self,
        path: &str,
        authorization: Option<&str>,
    ) -> Result<Option<RequestIdentity>, SubwardenError> {
        if self.paths.is_public(path) {
            return Ok(None);
        }

        let header = authorization.ok_or(SubwardenError::Unauthenticated)?;
        let token = extract_bearer(header).ok_or(SubwardenError::Unauthenticated)?;

        match self.codec.decode(token, self.clock.as_ref()) {
            Ok(claims) => Ok(Some(RequestIdentity {
                subject: claims.sub,
            })),
            Err(err) => {
                warn!(path, error = %err, "rejected bearer token");
                Err(SubwardenError::Unauthenticated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::config::SubwardenConfig;
    use std::time::Duration;

    fn test_config() -> SubwardenConfig {
        SubwardenConfig {
            signing_secret_b64: "c3Vid2FyZGVuLXRlc3Qtc2lnbmluZy1zZWNyZXQ=".to_string(),
            token_ttl: Duration::from_millis(3_600_000),
            allowed_origin: "http://localhost:4200".to_string(),
            gateway_secret_key: "sk_test_123".to_string(),
        }
    }

    fn gate_at(rfc3339: &str) -> RequestGate {
        let config = test_config();
        let codec = Arc::new(TokenCodec::new(&config).unwrap());
        RequestGate::new(
            codec,
            PublicPaths::default(),
            Arc::new(MockClock::from_rfc3339(rfc3339)),
        )
    }

    fn token_issued_at(rfc3339: &str, subject: &str) -> String {
        let codec = TokenCodec::new(&test_config()).unwrap();
        codec
            .encode(subject, &MockClock::from_rfc3339(rfc3339))
            .unwrap()
    }

    #[test]
    fn extract_bearer_accepts_only_bearer_scheme() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract_bearer("bearer abc"), None);
        assert_eq!(extract_bearer("Bearer "), None);
        assert_eq!(extract_bearer(""), None);
    }

    #[test]
    fn public_path_passes_without_header() {
        let gate = gate_at("2024-01-01T00:00:00Z");
        let result = gate.authorize("/api/v1/auth/login", None).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn public_path_ignores_invalid_header() {
        let gate = gate_at("2024-01-01T00:00:00Z");
        let result = gate
            .authorize("/api/v1/users/42", Some("Bearer garbage"))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn protected_path_without_header_is_unauthenticated() {
        let gate = gate_at("2024-01-01T00:00:00Z");
        let result = gate.authorize("/api/v1/subs", None);
        assert!(matches!(result, Err(SubwardenError::Unauthenticated)));
    }

    #[test]
    fn protected_path_with_valid_token_binds_identity() {
        let gate = gate_at("2024-01-01T00:30:00Z");
        let token = token_issued_at("2024-01-01T00:00:00Z", "alice");

        let identity = gate
            .authorize("/api/v1/stripe/confirm", Some(&format!("Bearer {}", token)))
            .unwrap()
            .unwrap();
        assert_eq!(identity.subject, "alice");
    }

    #[test]
    fn expired_token_is_unauthenticated_without_detail() {
        let gate = gate_at("2024-01-02T00:00:00Z");
        let token = token_issued_at("2024-01-01T00:00:00Z", "alice");

        let result = gate.authorize("/api/v1/subs", Some(&format!("Bearer {}", token)));
        assert!(matches!(result, Err(SubwardenError::Unauthenticated)));
    }

    #[test]
    fn garbage_token_is_unauthenticated() {
        let gate = gate_at("2024-01-01T00:00:00Z");
        let result = gate.authorize("/api/v1/subs", Some("Bearer not.a.token"));
        assert!(matches!(result, Err(SubwardenError::Unauthenticated)));
    }

    #[test]
    fn wrong_scheme_is_unauthenticated() {
        let gate = gate_at("2024-01-01T00:00:00Z");
        let result = gate.authorize("/api/v1/subs", Some("Basic dXNlcjpwYXNz"));
        assert!(matches!(result, Err(SubwardenError::Unauthenticated)));
    }

    #[test]
    fn gate_is_safe_under_concurrent_requests() {
        let gate = Arc::new(gate_at("2024-01-01T00:30:00Z"));
        let token = token_issued_at("2024-01-01T00:00:00Z", "alice");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = Arc::clone(&gate);
                let header = format!("Bearer {}", token);
                std::thread::spawn(move || {
                    let identity = gate
                        .authorize("/api/v1/subs", Some(&header))
                        .unwrap()
                        .unwrap();
                    assert_eq!(identity.subject, "alice");
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
