// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription handles and member change events.

use tokio::sync::mpsc;

use crate::state::MemberCoverState;
use crate::types::EntityId;

/// Unique identifier for a subscription.
///
/// Returned inside a [`Subscription`] and used to unsubscribe later. IDs are
/// unique within a registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a subscription ID with the given value.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Notification that a member's snapshot changed.
///
/// Either side may be `None`: a member appearing for the first time has no
/// old state, a member removed from the registry has no new state.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberEvent {
    /// The member whose state changed.
    pub entity_id: EntityId,
    /// Snapshot before the change.
    pub old_state: Option<MemberCoverState>,
    /// Snapshot after the change.
    pub new_state: Option<MemberCoverState>,
}

impl MemberEvent {
    /// Creates a change event.
    #[must_use]
    pub fn new(
        entity_id: EntityId,
        old_state: Option<MemberCoverState>,
        new_state: Option<MemberCoverState>,
    ) -> Self {
        Self {
            entity_id,
            old_state,
            new_state,
        }
    }

    /// Returns `true` if the member had no data before this change.
    #[must_use]
    pub fn is_appearance(&self) -> bool {
        self.old_state.is_none() && self.new_state.is_some()
    }

    /// Returns `true` if the member has no data after this change.
    #[must_use]
    pub fn is_removal(&self) -> bool {
        self.new_state.is_none()
    }
}

/// A live subscription: its ID plus the channel on which events arrive.
///
/// The channel closes once the registry drops the subscription.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    events: mpsc::UnboundedReceiver<MemberEvent>,
}

impl Subscription {
    /// Wraps a registry-allocated ID and its event receiver.
    #[must_use]
    pub fn new(id: SubscriptionId, events: mpsc::UnboundedReceiver<MemberEvent>) -> Self {
        Self { id, events }
    }

    /// Returns the subscription ID.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Waits for the next event. Returns `None` once the subscription is
    /// cancelled.
    pub async fn recv(&mut self) -> Option<MemberEvent> {
        self.events.recv().await
    }

    /// Splits the subscription into its parts.
    #[must_use]
    pub fn into_parts(self) -> (SubscriptionId, mpsc::UnboundedReceiver<MemberEvent>) {
        (self.id, self.events)
    }
}
