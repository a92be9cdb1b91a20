// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Group manager for hosts running several cover groups.
//!
//! The [`GroupManager`] mirrors the host's configuration-entry lifecycle:
//!
//! - **Set up**: [`add_group`](GroupManager::add_group) builds and activates
//! - **Unload**: [`remove_group`](GroupManager::remove_group) deactivates and discards
//! - **Reload**: [`reload_group`](GroupManager::reload_group) rebuilds under the same ID
//! - **Options update**: [`update_group`](GroupManager::update_group) swaps the configuration, then reloads
//!
//! # Event Subscription
//!
//! ```no_run
//! use std::sync::Arc;
//! use cover_group::actuator::HttpConfig;
//! use cover_group::event::GroupEvent;
//! use cover_group::manager::GroupManager;
//! use cover_group::registry::InMemoryRegistry;
//!
//! # fn example() -> cover_group::Result<()> {
//! let invoker = Arc::new(HttpConfig::new("hass:8123").into_caller()?);
//! let manager = GroupManager::new(Arc::new(InMemoryRegistry::new()), invoker);
//! let mut events = manager.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(event) = events.recv().await {
//!         if let GroupEvent::GroupAdded { group_id, name } = event {
//!             println!("Group {group_id} ({name}) is up");
//!         }
//!     }
//! });
//! # Ok(())
//! # }
//! ```

mod group_manager;

pub use group_manager::GroupManager;
