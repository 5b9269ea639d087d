//! # Subwarden
//!
//! **Bearer-token request gating and payment-backed subscription
//! reconciliation for Rust.**
//!
//! Subwarden authenticates API callers with signed, time-bounded bearer
//! tokens and keeps local subscription state consistent with an external
//! payment gateway (Stripe's payment-intents API).
//!
//! ## Features
//!
//! - **HS256 bearer tokens** — symmetric key derived once from a base64
//!   secret; issuance and validation with injectable time
//! - **Request gating** — public-path allowlist, `Authorization: Bearer`
//!   extraction, per-request identity binding; decode failures are logged
//!   internally and surface only as an access denial
//! - **Gateway orchestration** — create / retrieve / confirm / cancel
//!   payment intents over blocking request/response calls, without retries
//! - **Subscription reconciliation** — whole-record replacement of one
//!   user's subscription when the gateway confirms a payment
//!
//! ## Quickstart
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use subwarden::{MemoryStore, StripeClient, SubscriptionManager, SubwardenConfig};
//!
//! fn main() -> Result<(), subwarden::SubwardenError> {
//!     let config = SubwardenConfig {
//!         signing_secret_b64: "c2VjcmV0LWtleS1tYXRlcmlhbA==".to_string(),
//!         token_ttl: Duration::from_millis(3_600_000),
//!         allowed_origin: "http://localhost:4200".to_string(),
//!         gateway_secret_key: "sk_test_your_key".to_string(),
//!     };
//!
//!     let gateway = StripeClient::new(&config)?;
//!     let store = Arc::new(MemoryStore::new());
//!     let manager = SubscriptionManager::new(config, gateway, store)?;
//!
//!     let token = manager.issue_token("alice")?;
//!     let identity = manager
//!         .authorize_request("/api/v1/subs", Some(&format!("Bearer {}", token)))?
//!         .expect("protected path binds an identity");
//!
//!     let intent = manager.create_payment(2000, "usd")?;
//!     let outcome = manager.confirm_payment(
//!         &identity,
//!         &intent.id,
//!         "pm_card_visa",
//!         "https://example.com/return",
//!     )?;
//!     println!("subscription active: {}", outcome.subscription.active);
//!     Ok(())
//! }
//! ```
//!
//! ## Consistency model
//!
//! Confirm-then-reconcile is not transactional across the two systems: if
//! the local update fails after the gateway confirmed the payment, the
//! confirmation is not rolled back. Subwarden logs that state at `error!`
//! level for operator remediation and propagates a reconciliation error.
//! Gateway-side cancellation has no local transition by design.
//!
//! There is no token revocation list; a token stays valid until its
//! embedded expiry, and rotating the signing secret (process restart)
//! invalidates all outstanding tokens.
//!
//! ## Configuration
//!
//! - `signing_secret_b64` — base64-encoded HMAC secret for tokens
//! - `token_ttl` — token lifetime (millisecond-granularity duration)
//! - `allowed_origin` — client origin, held for the transport layer
//! - `gateway_secret_key` — payment gateway credential
//!
//! All fields are read once at startup; see [`SubwardenConfig`].

#![deny(warnings)]
#![deny(missing_docs)]

// Core modules
pub mod clock;
pub mod config;
pub mod errors;

// Token layer
pub mod token;

// Request gating
pub mod gate;

// Gateway layer
pub mod gateway;

// Subscription layer
pub mod subscription;

// Manager (main public API)
pub mod manager;

// Re-exports for public API
pub use clock::{Clock, SystemClock};
pub use config::SubwardenConfig;
pub use errors::{SubwardenError, TokenError};
pub use gate::intercept::{extract_bearer, RequestGate, RequestIdentity};
pub use gate::paths::PublicPaths;
pub use gateway::http::{PaymentGateway, StripeClient};
pub use gateway::models::{IntentStatus, PaymentIntent};
pub use manager::{ConfirmationResult, SubscriptionManager};
pub use subscription::reconcile::SubscriptionReconciler;
pub use subscription::records::{Payment, Subscription, SubscriptionType};
pub use subscription::store::{MemoryStore, SubscriberStore};
pub use token::claims::Claims;
pub use token::codec::TokenCodec;

#[cfg(any(test, feature = "test-seams"))]
pub use clock::MockClock;
