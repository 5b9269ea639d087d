//! HS256 token encoding and decoding.
//!
//! The symmetric key is derived from the configured base64 secret exactly
//! once, at codec construction, and is immutable for the process lifetime.
//! Signature verification is delegated to `jsonwebtoken`; expiry is checked
//! separately against the injected [`Clock`], so both halves stay
//! deterministic under test.

use crate::clock::Clock;
use crate::config::SubwardenConfig;
use crate::errors::{SubwardenError, TokenError};
use crate::token::claims::Claims;
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Encoder/decoder for signed bearer tokens.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl TokenCodec {
    /// Build a codec from configuration, deriving the HMAC key from the
    /// base64-encoded secret.
    ///
    /// # Errors
    /// Returns `ConfigError` if the secret is not valid base64 or the TTL
    /// is below one second (`iat`/`exp` carry whole seconds).
    pub fn new(config: &SubwardenConfig) -> Result<Self, SubwardenError> {
        let encoding_key = EncodingKey::from_base64_secret(&config.signing_secret_b64)
            .map_err(|e| SubwardenError::ConfigError(format!("invalid signing secret: {}", e)))?;
        let decoding_key = DecodingKey::from_base64_secret(&config.signing_secret_b64)
            .map_err(|e| SubwardenError::ConfigError(format!("invalid signing secret: {}", e)))?;

        let ttl_seconds = config.token_ttl.as_secs() as i64;
        if ttl_seconds == 0 {
            return Err(SubwardenError::ConfigError(
                "token_ttl must be at least one second".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock, not the wall clock.
        validation.validate_exp = false;
        validation.validate_aud = false;

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            ttl_seconds,
        })
    }

    /// Issue a token for `subject`, valid from now until now + TTL.
    ///
    /// # Errors
    /// `EmptySubject` for an empty subject; signing itself cannot fail with
    /// a well-formed key.
    pub fn encode(&self, subject: &str, clock: &dyn Clock) -> Result<String, SubwardenError> {
        if subject.is_empty() {
            return Err(SubwardenError::EmptySubject);
        }

        let now = clock.now_unix();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SubwardenError::ConfigError(format!("token signing failed: {}", e)))
    }

    /// Verify and decode a token.
    ///
    /// # Errors
    /// * `Malformed` - the string does not parse into the expected structure
    /// * `InvalidSignature` - the signature does not verify against the key
    /// * `Expired` - `now` is strictly after the embedded `exp`
    pub fn decode(&self, token: &str, clock: &dyn Clock) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        let claims = data.claims;
        let now = clock.now_unix();
        if now > claims.exp {
            return Err(TokenError::Expired {
                expired_for_seconds: now - claims.exp,
            });
        }

        Ok(claims)
    }

    /// Configured token lifetime in whole seconds.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }
}
