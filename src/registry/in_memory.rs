// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory state registry.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::state::MemberCoverState;
use crate::types::EntityId;

use super::{MemberEvent, StateRegistry, Subscription, SubscriptionId};

/// A subscriber's filter and delivery channel.
struct Subscriber {
    entity_ids: HashSet<EntityId>,
    sender: mpsc::UnboundedSender<MemberEvent>,
}

/// Registry that keeps member snapshots in memory.
///
/// The host pushes every state it learns about through
/// [`set_state`](Self::set_state) and [`remove_state`](Self::remove_state);
/// subscribers whose filter contains the entity receive a [`MemberEvent`].
///
/// # Thread Safety
///
/// State and subscriber tables live behind `parking_lot::RwLock`. Locks are
/// never held across an `.await`; events are sent on unbounded channels so
/// publishing never blocks.
///
/// # Examples
///
/// ```
/// use cover_group::registry::{InMemoryRegistry, StateRegistry};
/// use cover_group::state::MemberCoverState;
/// use cover_group::types::{CoverLifecycle, EntityId};
///
/// let registry = InMemoryRegistry::new();
/// registry.set_state(MemberCoverState::new("cover.a", CoverLifecycle::Open));
///
/// let state = registry.get_state(&EntityId::new("cover.a")).unwrap();
/// assert_eq!(state.lifecycle(), CoverLifecycle::Open);
/// assert!(registry.get_state(&EntityId::new("cover.b")).is_none());
/// ```
pub struct InMemoryRegistry {
    next_id: AtomicU64,
    states: RwLock<HashMap<EntityId, MemberCoverState>>,
    subscribers: RwLock<HashMap<SubscriptionId, Subscriber>>,
}

impl InMemoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            states: RwLock::new(HashMap::new()),
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Stores a snapshot, replacing any previous one, and notifies
    /// subscribers of that entity.
    ///
    /// Subscribers are notified even when the snapshot is unchanged.
    pub fn set_state(&self, state: MemberCoverState) {
        let entity_id = state.entity_id().clone();
        let old_state = self
            .states
            .write()
            .insert(entity_id.clone(), state.clone());

        self.notify(MemberEvent::new(entity_id, old_state, Some(state)));
    }

    /// Removes the snapshot of an entity so it reads as "no data".
    ///
    /// Returns the removed snapshot. Subscribers are only notified when
    /// something was actually removed.
    pub fn remove_state(&self, entity_id: &EntityId) -> Option<MemberCoverState> {
        let old_state = self.states.write().remove(entity_id);

        if old_state.is_some() {
            self.notify(MemberEvent::new(entity_id.clone(), old_state.clone(), None));
        }

        old_state
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    fn notify(&self, event: MemberEvent) {
        let mut closed = Vec::new();

        {
            let subscribers = self.subscribers.read();
            for (id, subscriber) in subscribers.iter() {
                if !subscriber.entity_ids.contains(&event.entity_id) {
                    continue;
                }
                if subscriber.sender.send(event.clone()).is_err() {
                    closed.push(*id);
                }
            }
        }

        if !closed.is_empty() {
            let mut subscribers = self.subscribers.write();
            for id in closed {
                tracing::debug!(subscription = %id, "Cleaning up dropped subscription");
                subscribers.remove(&id);
            }
        }
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRegistry")
            .field("states", &self.states.read().len())
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

impl StateRegistry for InMemoryRegistry {
    fn subscribe(&self, entity_ids: &[EntityId]) -> Subscription {
        let id = self.next_id();
        let (sender, events) = mpsc::unbounded_channel();

        self.subscribers.write().insert(
            id,
            Subscriber {
                entity_ids: entity_ids.iter().cloned().collect(),
                sender,
            },
        );

        tracing::debug!(subscription = %id, entities = entity_ids.len(), "Registered subscription");
        Subscription::new(id, events)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.write().remove(&id).is_some()
    }

    fn get_state(&self, entity_id: &EntityId) -> Option<MemberCoverState> {
        self.states.read().get(entity_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CoverLifecycle;

    fn closed(id: &str) -> MemberCoverState {
        MemberCoverState::new(id, CoverLifecycle::Closed)
    }

    #[test]
    fn subscribe_and_unsubscribe() {
        let registry = InMemoryRegistry::new();
        let subscription = registry.subscribe(&[EntityId::new("cover.a")]);
        assert_eq!(registry.subscriber_count(), 1);

        assert!(registry.unsubscribe(subscription.id()));
        assert_eq!(registry.subscriber_count(), 0);
        assert!(!registry.unsubscribe(subscription.id()));
    }

    #[test]
    fn subscription_ids_are_unique() {
        let registry = InMemoryRegistry::new();
        let a = registry.subscribe(&[]);
        let b = registry.subscribe(&[]);
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn set_state_notifies_matching_subscriber() {
        let registry = InMemoryRegistry::new();
        let mut subscription = registry.subscribe(&[EntityId::new("cover.a")]);

        registry.set_state(closed("cover.a"));

        let event = subscription.recv().await.unwrap();
        assert_eq!(event.entity_id, EntityId::new("cover.a"));
        assert!(event.is_appearance());
    }

    #[tokio::test]
    async fn other_entities_are_filtered_out() {
        let registry = InMemoryRegistry::new();
        let subscription = registry.subscribe(&[EntityId::new("cover.a")]);
        let (_, mut events) = subscription.into_parts();

        registry.set_state(closed("cover.b"));

        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn remove_state_emits_removal() {
        let registry = InMemoryRegistry::new();
        registry.set_state(closed("cover.a"));
        let mut subscription = registry.subscribe(&[EntityId::new("cover.a")]);

        let removed = registry.remove_state(&EntityId::new("cover.a"));
        assert_eq!(removed, Some(closed("cover.a")));

        let event = subscription.recv().await.unwrap();
        assert!(event.is_removal());
        assert!(registry.get_state(&EntityId::new("cover.a")).is_none());
    }

    #[test]
    fn remove_missing_state_is_silent() {
        let registry = InMemoryRegistry::new();
        let subscription = registry.subscribe(&[EntityId::new("cover.a")]);
        let (_, mut events) = subscription.into_parts();

        assert!(registry.remove_state(&EntityId::new("cover.a")).is_none());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let registry = InMemoryRegistry::new();
        let subscription = registry.subscribe(&[EntityId::new("cover.a")]);
        drop(subscription);

        registry.set_state(closed("cover.a"));
        assert_eq!(registry.subscriber_count(), 0);
    }
}
