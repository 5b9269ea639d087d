//! Post-confirmation subscription reconciliation.
//!
//! Drives the only local state transitions in the system:
//!
//! ```text
//! created -> (gateway confirm) -> succeeded | failed
//!   succeeded -> replacement with active=true, window = today..today+duration
//!   otherwise -> replacement mirroring the payment, window untouched
//! ```
//!
//! A gateway-side cancellation has no local transition: an active
//! subscription stays active until its window lapses.

use crate::clock::Clock;
use crate::errors::SubwardenError;
use crate::gateway::models::PaymentIntent;
use crate::subscription::records::{Payment, Subscription};
use crate::subscription::store::SubscriberStore;
use std::sync::Arc;
use tracing::{debug, error};

/// Applies a confirmed payment to exactly one user's subscription.
pub struct SubscriptionReconciler<S: SubscriberStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: SubscriberStore> SubscriptionReconciler<S> {
    /// Build a reconciler over a store and a clock.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Replace `subject`'s subscription according to the confirmed intent.
    ///
    /// On a succeeded intent the replacement is activated with a fresh
    /// window starting today; re-applying the same intent recomputes the
    /// same window and never extends an existing `end_date`. On any other
    /// status only the payment mirror changes.
    ///
    /// # Errors
    /// * `ReconciliationError` - the user/subscription cannot be found, the
    ///   stored payment is already linked to a different intent, or the
    ///   store rejected the replacement. The preceding gateway confirmation
    ///   is NOT rolled back; the inconsistency is logged for operators.
    /// * `Forbidden` - the stored payment names a different owner.
    pub fn reconcile(
        &self,
        subject: &str,
        intent: &PaymentIntent,
    ) -> Result<Subscription, SubwardenError> {
        let current = match self.store.subscription(subject) {
            Ok(subscription) => subscription,
            Err(err) => {
                error!(
                    subject,
                    intent_id = %intent.id,
                    "gateway-confirmed payment has no local subscription to apply to"
                );
                return Err(SubwardenError::ReconciliationError(format!(
                    "cannot load subscription for {}: {}",
                    subject, err
                )));
            }
        };

        if !current.payment.user.is_empty() && current.payment.user != subject {
            return Err(SubwardenError::Forbidden {
                subject: subject.to_string(),
            });
        }

        // One payment record maps to one gateway intent for its lifetime.
        if !current.payment.id_stripe.is_empty() && current.payment.id_stripe != intent.id {
            return Err(SubwardenError::ReconciliationError(format!(
                "payment {} is already linked to intent {}",
                current.payment.id, current.payment.id_stripe
            )));
        }

        let payment = Payment::mirrored(current.payment.id.clone(), subject, intent);
        let replacement = if intent.status.is_succeeded() {
            current.activated(self.clock.today(), payment)?
        } else {
            current.with_payment(payment)
        };

        if let Err(err) = self
            .store
            .replace_subscription(subject, replacement.clone())
        {
            error!(
                subject,
                intent_id = %intent.id,
                error = %err,
                "payment confirmed at gateway but local subscription update failed"
            );
            return Err(SubwardenError::ReconciliationError(format!(
                "subscription update failed after confirmed payment {}: {}",
                intent.id, err
            )));
        }

        debug!(
            subject,
            intent_id = %intent.id,
            status = intent.status.as_str(),
            active = replacement.active,
            "subscription reconciled"
        );
        Ok(replacement)
    }
}
