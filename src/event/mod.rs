// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Group identity and group manager events.
//!
//! The [`EventBus`] uses tokio's broadcast channel so any number of host
//! components can follow groups being added, removed, reloaded and
//! commanded.
//!
//! # Examples
//!
//! ```
//! use cover_group::event::{EventBus, GroupEvent, GroupId};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! let group_id = GroupId::new();
//! bus.publish(GroupEvent::group_added(group_id, "Bedroom"));
//! ```

mod event_bus;
mod group_event;
mod group_id;

pub use event_bus::EventBus;
pub use group_event::GroupEvent;
pub use group_id::GroupId;
