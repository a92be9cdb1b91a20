// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device registry abstraction.
//!
//! The registry owns the latest snapshot of every member cover and delivers
//! change notifications. Cover groups only read from it: they subscribe to
//! their members, pull snapshots on every notification, and unsubscribe on
//! teardown.
//!
//! # Overview
//!
//! - [`StateRegistry`] - Trait implemented by any state source
//! - [`InMemoryRegistry`] - Registry fed directly by the host
//! - [`Subscription`] / [`SubscriptionId`] - A live subscription and its handle
//! - [`MemberEvent`] - Notification payload
//!
//! # Examples
//!
//! ```
//! use cover_group::registry::{InMemoryRegistry, StateRegistry};
//! use cover_group::types::EntityId;
//!
//! let registry = InMemoryRegistry::new();
//! let subscription = registry.subscribe(&[EntityId::new("cover.a")]);
//!
//! // Later, unsubscribe
//! assert!(registry.unsubscribe(subscription.id()));
//! ```

mod in_memory;
mod subscription;

pub use in_memory::InMemoryRegistry;
pub use subscription::{MemberEvent, Subscription, SubscriptionId};

use crate::state::MemberCoverState;
use crate::types::EntityId;

/// Source of member snapshots and change notifications.
pub trait StateRegistry: Send + Sync {
    /// Subscribes to changes of the given entities.
    ///
    /// Every change to any of them, including appearing in or disappearing
    /// from the registry, is delivered on the returned subscription.
    fn subscribe(&self, entity_ids: &[EntityId]) -> Subscription;

    /// Cancels a subscription.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Returns the current snapshot of an entity, or `None` if the registry
    /// has no data for it. Never blocks.
    fn get_state(&self, entity_id: &EntityId) -> Option<MemberCoverState>;
}

impl<T: StateRegistry + ?Sized> StateRegistry for std::sync::Arc<T> {
    fn subscribe(&self, entity_ids: &[EntityId]) -> Subscription {
        (**self).subscribe(entity_ids)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        (**self).unsubscribe(id)
    }

    fn get_state(&self, entity_id: &EntityId) -> Option<MemberCoverState> {
        (**self).get_state(entity_id)
    }
}
