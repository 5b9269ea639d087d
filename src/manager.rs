//! Subscription manager - the main public API.
//!
//! The `SubscriptionManager` composes the token codec, request gate,
//! payment gateway, and reconciler:
//! - Per-request gating (stateless, concurrency-safe)
//! - Token issuance for the login flow
//! - Payment-intent orchestration against the gateway
//! - Post-confirmation subscription reconciliation

use crate::clock::{Clock, SystemClock};
use crate::config::SubwardenConfig;
use crate::errors::SubwardenError;
use crate::gate::intercept::{RequestGate, RequestIdentity};
use crate::gate::paths::PublicPaths;
use crate::gateway::http::PaymentGateway;
use crate::gateway::models::PaymentIntent;
use crate::subscription::reconcile::SubscriptionReconciler;
use crate::subscription::records::Subscription;
use crate::subscription::store::SubscriberStore;
use crate::token::codec::TokenCodec;
use std::sync::Arc;
use tracing::info;

/// Outcome of a confirm-and-reconcile round trip.
#[derive(Debug, Clone)]
pub struct ConfirmationResult {
    /// The intent snapshot the gateway returned from the confirm call.
    pub intent: PaymentIntent,

    /// The replaced subscription record.
    pub subscription: Subscription,
}

/// Main entry point tying the gate, gateway, and reconciler together.
///
/// Create one instance at startup and share it; all methods take `&self`
/// and are safe for concurrent requests.
pub struct SubscriptionManager<G: PaymentGateway, S: SubscriberStore> {
    config: SubwardenConfig,
    clock: Arc<dyn Clock>,
    codec: Arc<TokenCodec>,
    gate: RequestGate,
    gateway: G,
    reconciler: SubscriptionReconciler<S>,
}

impl<G: PaymentGateway, S: SubscriberStore> SubscriptionManager<G, S> {
    /// Create a manager with the given configuration, gateway, and store.
    ///
    /// Uses the system clock and the default public-path allowlist.
    ///
    /// # Errors
    /// Returns an error if configuration validation fails or the signing
    /// key cannot be derived.
    pub fn new(
        config: SubwardenConfig,
        gateway: G,
        store: Arc<S>,
    ) -> Result<Self, SubwardenError> {
        config.validate()?;
        Self::with_clock(config, gateway, store, Arc::new(SystemClock))
    }

    /// Create a manager with a custom clock (for testing).
    #[cfg(any(test, feature = "test-seams"))]
    pub fn new_with_clock(
        config: SubwardenConfig,
        gateway: G,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SubwardenError> {
        config.validate()?;
        Self::with_clock(config, gateway, store, clock)
    }

    fn with_clock(
        config: SubwardenConfig,
        gateway: G,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SubwardenError> {
        let codec = Arc::new(TokenCodec::new(&config)?);
        let gate = RequestGate::new(
            Arc::clone(&codec),
            PublicPaths::default(),
            Arc::clone(&clock),
        );
        let reconciler = SubscriptionReconciler::new(store, Arc::clone(&clock));

        Ok(Self {
            config,
            clock,
            codec,
            gate,
            gateway,
            reconciler,
        })
    }

    /// Issue a bearer token for `subject` (login support).
    pub fn issue_token(&self, subject: &str) -> Result<String, SubwardenError> {
        self.codec.encode(subject, self.clock.as_ref())
    }

    /// Gate one inbound request; see [`RequestGate::authorize`].
    pub fn authorize_request(
        &self,
        path: &str,
        authorization: Option<&str>,
    ) -> Result<Option<RequestIdentity>, SubwardenError> {
        self.gate.authorize(path, authorization)
    }

    /// Create a payment intent at the gateway.
    pub fn create_payment(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, SubwardenError> {
        self.gateway.create_intent(amount, currency)
    }

    /// Confirm a payment intent and reconcile the subject's subscription.
    ///
    /// The intent is retrieved first, then confirmed, then applied locally.
    /// If reconciliation fails the gateway confirmation is NOT rolled back;
    /// the reconciler logs the inconsistency for operators and the error
    /// propagates.
    pub fn confirm_payment(
        &self,
        identity: &RequestIdentity,
        intent_id: &str,
        payment_method: &str,
        return_url: &str,
    ) -> Result<ConfirmationResult, SubwardenError> {
        self.gateway.retrieve_intent(intent_id)?;
        let confirmed = self
            .gateway
            .confirm_intent(intent_id, payment_method, return_url)?;
        let subscription = self.reconciler.reconcile(&identity.subject, &confirmed)?;

        Ok(ConfirmationResult {
            intent: confirmed,
            subscription,
        })
    }

    /// Cancel a payment intent at the gateway.
    ///
    /// No local subscription transition is applied: an active subscription
    /// stays active until its window lapses.
    pub fn cancel_payment(&self, intent_id: &str) -> Result<PaymentIntent, SubwardenError> {
        let canceled = self.gateway.cancel_intent(intent_id)?;
        info!(
            intent_id = %canceled.id,
            "payment intent canceled at gateway; local subscription state unchanged"
        );
        Ok(canceled)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &SubwardenConfig {
        &self.config
    }
}
