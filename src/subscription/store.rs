//! Persistence seam for subscription records.
//!
//! How subscriptions are stored is out of scope for this crate; the trait
//! pins down the two operations the reconciler needs and the atomicity it
//! relies on. [`MemoryStore`] is the reference implementation.

use crate::errors::SubwardenError;
use crate::subscription::records::Subscription;
use std::collections::HashMap;
use std::sync::RwLock;

/// Storage boundary for user subscriptions.
///
/// Contract for implementors: `replace_subscription` is a whole-record
/// replacement, atomic with respect to concurrent readers (no torn mix of
/// old and new fields), and replacements for the same user are serialized —
/// of two racing writers, the later-committing one wins deterministically.
/// Cross-user operations need no coordination.
pub trait SubscriberStore: Send + Sync {
    /// Load the current subscription for `username`.
    ///
    /// # Errors
    /// `NotFound` if the user or their subscription is unknown.
    fn subscription(&self, username: &str) -> Result<Subscription, SubwardenError>;

    /// Atomically replace the stored subscription for `username`.
    ///
    /// # Errors
    /// `NotFound` if there is no existing record to replace.
    fn replace_subscription(
        &self,
        username: &str,
        replacement: Subscription,
    ) -> Result<(), SubwardenError>;
}

/// In-memory store backed by a `RwLock`.
///
/// The write lock serializes all replacements, which satisfies the per-user
/// serialization contract with room to spare.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Subscription>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user's subscription (provisioning is otherwise out of scope).
    pub fn insert(&self, username: impl Into<String>, subscription: Subscription) {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        records.insert(username.into(), subscription);
    }
}

impl SubscriberStore for MemoryStore {
    fn subscription(&self, username: &str) -> Result<Subscription, SubwardenError> {
        let records = self
            .records
            .read()
            .map_err(|_| SubwardenError::ReconciliationError("store lock poisoned".to_string()))?;
        records
            .get(username)
            .cloned()
            .ok_or_else(|| SubwardenError::NotFound(format!("subscription for {}", username)))
    }

    fn replace_subscription(
        &self,
        username: &str,
        replacement: Subscription,
    ) -> Result<(), SubwardenError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| SubwardenError::ReconciliationError("store lock poisoned".to_string()))?;
        match records.get_mut(username) {
            Some(slot) => {
                *slot = replacement;
                Ok(())
            }
            None => Err(SubwardenError::NotFound(format!(
                "subscription for {}",
                username
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::models::IntentStatus;
    use crate::subscription::records::{Payment, SubscriptionType};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn subscription(id: &str, user: &str) -> Subscription {
        Subscription {
            id: id.to_string(),
            active: false,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            subscription_type: SubscriptionType::new("monthly", 30).unwrap(),
            payment: Payment {
                id: format!("pay-{}", id),
                id_stripe: String::new(),
                status: IntentStatus::Created,
                user: user.to_string(),
            },
        }
    }

    #[test]
    fn insert_then_load() {
        let store = MemoryStore::new();
        store.insert("alice", subscription("sub-1", "alice"));

        let loaded = store.subscription("alice").unwrap();
        assert_eq!(loaded.id, "sub-1");
    }

    #[test]
    fn unknown_user_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.subscription("nobody"),
            Err(SubwardenError::NotFound(_))
        ));
    }

    #[test]
    fn replace_requires_existing_record() {
        let store = MemoryStore::new();
        let result = store.replace_subscription("alice", subscription("sub-1", "alice"));
        assert!(matches!(result, Err(SubwardenError::NotFound(_))));
    }

    #[test]
    fn replacement_is_whole_record() {
        let store = MemoryStore::new();
        store.insert("alice", subscription("sub-1", "alice"));

        let mut replacement = subscription("sub-1", "alice");
        replacement.active = true;
        replacement.payment.id_stripe = "pi_1".to_string();
        store
            .replace_subscription("alice", replacement.clone())
            .unwrap();

        assert_eq!(store.subscription("alice").unwrap(), replacement);
    }

    #[test]
    fn racing_replacements_leave_one_coherent_record() {
        let store = Arc::new(MemoryStore::new());
        store.insert("alice", subscription("sub-1", "alice"));

        let mut a = subscription("sub-1", "alice");
        a.active = true;
        a.payment.id_stripe = "pi_a".to_string();
        a.payment.status = IntentStatus::Succeeded;

        let mut b = subscription("sub-1", "alice");
        b.active = true;
        b.payment.id_stripe = "pi_b".to_string();
        b.payment.status = IntentStatus::Succeeded;

        let handles: Vec<_> = [a.clone(), b.clone()]
            .into_iter()
            .map(|replacement| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.replace_subscription("alice", replacement).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // One writer committed last; either way the record is one of the two
        // complete replacements, never a field mix.
        let stored = store.subscription("alice").unwrap();
        assert!(stored == a || stored == b);
    }
}
