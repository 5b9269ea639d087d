//! Subscription value records.
//!
//! Plain immutable records with explicit constructors. A subscription is
//! only ever replaced as a whole — callers never see a mix of old and new
//! fields.

use crate::errors::SubwardenError;
use crate::gateway::models::{IntentStatus, PaymentIntent};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Immutable reference data describing one subscription tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionType {
    /// Tier name.
    pub name: String,

    /// Length of one activation window, in days. Strictly positive.
    pub duration_days: u64,
}

impl SubscriptionType {
    /// Build a subscription type, rejecting a zero-day window.
    pub fn new(name: impl Into<String>, duration_days: u64) -> Result<Self, SubwardenError> {
        if duration_days == 0 {
            return Err(SubwardenError::ConfigError(
                "duration_days must be positive".to_string(),
            ));
        }
        Ok(Self {
            name: name.into(),
            duration_days,
        })
    }
}

/// Local mirror of one payment.
///
/// `id_stripe` is a foreign reference to the gateway intent and is immutable
/// once set: one payment record maps to exactly one gateway intent for its
/// lifetime. `status` is the gateway status as of the last reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Local payment record id.
    pub id: String,

    /// Gateway payment-intent id; empty until first linked.
    pub id_stripe: String,

    /// Gateway status mirrored at reconciliation time.
    pub status: IntentStatus,

    /// Username back-reference to the owning user (non-owning).
    pub user: String,
}

impl Payment {
    /// Mirror a gateway intent into a payment record, keeping the local id
    /// and owner.
    pub fn mirrored(id: impl Into<String>, user: impl Into<String>, intent: &PaymentIntent) -> Self {
        Self {
            id: id.into(),
            id_stripe: intent.id.clone(),
            status: intent.status,
            user: user.into(),
        }
    }
}

/// One user's subscription.
///
/// Invariant: `end_date == start_date + duration_days`, and `active` is true
/// only while the linked payment mirrored a successful confirmation at the
/// last reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Subscription record id.
    pub id: String,

    /// Whether the subscription currently grants access.
    pub active: bool,

    /// First day of the activation window.
    pub start_date: NaiveDate,

    /// Last day of the activation window.
    pub end_date: NaiveDate,

    /// The tier this subscription is for.
    pub subscription_type: SubscriptionType,

    /// The payment backing this subscription.
    pub payment: Payment,
}

impl Subscription {
    /// Build the activated replacement for this subscription: same id and
    /// tier, window starting `today`, carrying `payment`.
    pub fn activated(
        &self,
        today: NaiveDate,
        payment: Payment,
    ) -> Result<Subscription, SubwardenError> {
        let end_date = today
            .checked_add_days(Days::new(self.subscription_type.duration_days))
            .ok_or_else(|| {
                SubwardenError::ReconciliationError(
                    "subscription window exceeds the calendar range".to_string(),
                )
            })?;

        Ok(Subscription {
            id: self.id.clone(),
            active: true,
            start_date: today,
            end_date,
            subscription_type: self.subscription_type.clone(),
            payment,
        })
    }

    /// Build a replacement that mirrors `payment` but leaves the activation
    /// window and `active` flag untouched (non-successful confirmations).
    pub fn with_payment(&self, payment: Payment) -> Subscription {
        Subscription {
            id: self.id.clone(),
            active: self.active,
            start_date: self.start_date,
            end_date: self.end_date,
            subscription_type: self.subscription_type.clone(),
            payment,
        }
    }

    /// Number of days in the activation window.
    pub fn window_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}
