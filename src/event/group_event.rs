// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Group manager event types.

use crate::group::CoverCommand;

use super::GroupId;

/// Events emitted by the group manager.
///
/// # Examples
///
/// ```
/// use cover_group::event::{GroupEvent, GroupId};
///
/// let group_id = GroupId::new();
/// let added = GroupEvent::group_added(group_id, "Living Room");
/// assert!(added.is_lifecycle());
/// assert_eq!(added.group_id(), group_id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupEvent {
    /// A group was set up and activated.
    GroupAdded {
        /// The ID of the added group.
        group_id: GroupId,
        /// Display name of the group.
        name: String,
    },

    /// A group was deactivated and discarded.
    GroupRemoved {
        /// The ID of the removed group.
        group_id: GroupId,
    },

    /// A group was torn down and rebuilt under the same ID.
    GroupReloaded {
        /// The ID of the reloaded group.
        group_id: GroupId,
    },

    /// A command was dispatched to a group.
    CommandDispatched {
        /// The ID of the group.
        group_id: GroupId,
        /// The dispatched command.
        command: CoverCommand,
    },
}

impl GroupEvent {
    /// Returns the group ID associated with this event.
    #[must_use]
    pub fn group_id(&self) -> GroupId {
        match self {
            Self::GroupAdded { group_id, .. }
            | Self::GroupRemoved { group_id }
            | Self::GroupReloaded { group_id }
            | Self::CommandDispatched { group_id, .. } => *group_id,
        }
    }

    /// Returns `true` for add, remove and reload events.
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        !matches!(self, Self::CommandDispatched { .. })
    }

    /// Creates a group added event.
    #[must_use]
    pub fn group_added(group_id: GroupId, name: impl Into<String>) -> Self {
        Self::GroupAdded {
            group_id,
            name: name.into(),
        }
    }

    /// Creates a group removed event.
    #[must_use]
    pub fn group_removed(group_id: GroupId) -> Self {
        Self::GroupRemoved { group_id }
    }

    /// Creates a group reloaded event.
    #[must_use]
    pub fn group_reloaded(group_id: GroupId) -> Self {
        Self::GroupReloaded { group_id }
    }

    /// Creates a command dispatched event.
    #[must_use]
    pub fn command_dispatched(group_id: GroupId, command: CoverCommand) -> Self {
        Self::CommandDispatched { group_id, command }
    }
}
