//! Bearer token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity claims carried by a bearer token.
///
/// Immutable once issued: consumers verify and read, never mutate. Instants
/// are unix-seconds, the wire granularity of `iat`/`exp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the unique username this token proves.
    pub sub: String,

    /// Issued-at, unix seconds.
    pub iat: i64,

    /// Expiry, unix seconds. The token is invalid strictly after this.
    pub exp: i64,
}

impl Claims {
    /// The subject (username) the token was issued for.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Issued-at as a UTC instant. `None` if `iat` is out of range.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Expiry as a UTC instant. `None` if `exp` is out of range.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
