// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Manager owning the cover groups of one host.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast, watch};

use crate::actuator::ActuatorInvoker;
use crate::error::{Error, Result};
use crate::event::{EventBus, GroupEvent, GroupId};
use crate::group::{CoverCommand, CoverGroup, CoverGroupConfig};
use crate::registry::StateRegistry;
use crate::state::DerivedState;

/// Manager for the cover groups configured on a host.
///
/// The manager holds explicit handles to the registry and the invoker and
/// passes them to every group it builds; there is no global state.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use cover_group::actuator::HttpConfig;
/// use cover_group::group::{CoverCommand, CoverGroupConfig};
/// use cover_group::manager::GroupManager;
/// use cover_group::registry::InMemoryRegistry;
///
/// #[tokio::main]
/// async fn main() -> cover_group::Result<()> {
///     let registry = Arc::new(InMemoryRegistry::new());
///     let invoker = Arc::new(HttpConfig::new("hass:8123").into_caller()?);
///     let manager = GroupManager::new(registry, invoker);
///
///     let config = CoverGroupConfig::new("Office")
///         .with_cover("cover.office")
///         .with_open_button("button.o")
///         .with_close_button("button.c")
///         .with_stop_button("button.s");
///     let group_id = manager.add_group(config).await?;
///
///     manager.execute(group_id, CoverCommand::Open).await?;
///     Ok(())
/// }
/// ```
pub struct GroupManager<R: StateRegistry, I> {
    groups: RwLock<HashMap<GroupId, CoverGroup<R, I>>>,
    registry: Arc<R>,
    invoker: Arc<I>,
    event_bus: EventBus,
}

impl<R, I> GroupManager<R, I>
where
    R: StateRegistry + 'static,
    I: ActuatorInvoker,
{
    /// Creates a manager with no groups.
    #[must_use]
    pub fn new(registry: Arc<R>, invoker: Arc<I>) -> Self {
        Self::with_capacity(registry, invoker, 256)
    }

    /// Creates a manager with a custom event bus capacity.
    #[must_use]
    pub fn with_capacity(registry: Arc<R>, invoker: Arc<I>, event_capacity: usize) -> Self {
        Self {
            groups: RwLock::new(HashMap::new()),
            registry,
            invoker,
            event_bus: EventBus::with_capacity(event_capacity),
        }
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribes to group events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GroupEvent> {
        self.event_bus.subscribe()
    }

    // =========================================================================
    // Group Management
    // =========================================================================

    /// Builds and activates a group from its configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid.
    pub async fn add_group(&self, config: CoverGroupConfig) -> Result<GroupId> {
        let mut group = CoverGroup::new(config, Arc::clone(&self.registry), Arc::clone(&self.invoker))?;
        group.activate()?;

        let group_id = group.id();
        let name = group.name().to_string();
        self.groups.write().await.insert(group_id, group);

        tracing::info!(%group_id, name = %name, "Cover group set up");
        self.event_bus.publish(GroupEvent::group_added(group_id, name));
        Ok(group_id)
    }

    /// Deactivates and discards a group.
    ///
    /// Returns `true` if the group was found and removed.
    pub async fn remove_group(&self, group_id: GroupId) -> bool {
        let removed = self.groups.write().await.remove(&group_id);

        match removed {
            Some(mut group) => {
                group.deactivate();
                tracing::info!(%group_id, "Cover group unloaded");
                self.event_bus.publish(GroupEvent::group_removed(group_id));
                true
            }
            None => false,
        }
    }

    /// Tears a group down and rebuilds it from its current configuration,
    /// keeping the same ID.
    ///
    /// # Errors
    ///
    /// Returns `Error::GroupNotFound` if no group has this ID.
    pub async fn reload_group(&self, group_id: GroupId) -> Result<()> {
        let config = self
            .groups
            .read()
            .await
            .get(&group_id)
            .map(|group| group.config().clone())
            .ok_or(Error::GroupNotFound)?;

        self.replace_group(group_id, config).await
    }

    /// Replaces a group's configuration and reloads it.
    ///
    /// The new configuration is validated before the running group is
    /// touched; an invalid one leaves the group as it was.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid, or
    /// `Error::GroupNotFound` if no group has this ID.
    pub async fn update_group(&self, group_id: GroupId, config: CoverGroupConfig) -> Result<()> {
        config.validate()?;
        if !self.groups.read().await.contains_key(&group_id) {
            return Err(Error::GroupNotFound);
        }

        self.replace_group(group_id, config).await
    }

    async fn replace_group(&self, group_id: GroupId, config: CoverGroupConfig) -> Result<()> {
        let mut groups = self.groups.write().await;

        let mut old = groups.remove(&group_id).ok_or(Error::GroupNotFound)?;
        old.deactivate();
        drop(old);

        let mut group = CoverGroup::with_id(
            group_id,
            config,
            Arc::clone(&self.registry),
            Arc::clone(&self.invoker),
        )?;
        group.activate()?;
        groups.insert(group_id, group);
        drop(groups);

        tracing::info!(%group_id, "Cover group reloaded");
        self.event_bus.publish(GroupEvent::group_reloaded(group_id));
        Ok(())
    }

    /// Deactivates and discards every group.
    pub async fn shutdown(&self) {
        let groups: Vec<_> = self.groups.write().await.drain().collect();

        for (group_id, mut group) in groups {
            group.deactivate();
            self.event_bus.publish(GroupEvent::group_removed(group_id));
        }
    }

    /// Returns a list of all group IDs.
    pub async fn group_ids(&self) -> Vec<GroupId> {
        self.groups.read().await.keys().copied().collect()
    }

    /// Returns the number of managed groups.
    pub async fn group_count(&self) -> usize {
        self.groups.read().await.len()
    }

    /// Returns the configuration of a group.
    pub async fn config(&self, group_id: GroupId) -> Option<CoverGroupConfig> {
        self.groups
            .read()
            .await
            .get(&group_id)
            .map(|group| group.config().clone())
    }

    // =========================================================================
    // State and commands
    // =========================================================================

    /// Returns the current derived state of a group.
    pub async fn state(&self, group_id: GroupId) -> Option<DerivedState> {
        self.groups.read().await.get(&group_id).map(CoverGroup::state)
    }

    /// Returns a watch receiver following a group's derived state.
    ///
    /// The receiver stops receiving updates once the group is reloaded or
    /// removed.
    pub async fn watch_group(&self, group_id: GroupId) -> Option<watch::Receiver<DerivedState>> {
        self.groups.read().await.get(&group_id).map(CoverGroup::watch)
    }

    /// Dispatches a command to a group.
    ///
    /// # Errors
    ///
    /// Returns `Error::GroupNotFound` if no group has this ID.
    pub async fn execute(&self, group_id: GroupId, command: CoverCommand) -> Result<()> {
        let groups = self.groups.read().await;
        let group = groups.get(&group_id).ok_or(Error::GroupNotFound)?;

        group.execute(command).await?;
        drop(groups);

        self.event_bus
            .publish(GroupEvent::command_dispatched(group_id, command));
        Ok(())
    }
}

impl<R: StateRegistry, I> std::fmt::Debug for GroupManager<R, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupManager")
            .field("event_bus", &self.event_bus)
            .finish_non_exhaustive()
    }
}
