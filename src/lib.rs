// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cover Group - present several Lutron covers as one virtual cover.
//!
//! A cover group watches a set of physical covers, derives one aggregate
//! state from them, and translates commands on the aggregate into calls on
//! the underlying actuators: Pico remote buttons for open/close/stop and
//! per-cover position calls for set-position.
//!
//! # Supported Features
//!
//! - **Aggregation**: mean position, open/opening/closing/closed flags
//! - **Sticky position**: the last known position survives members that
//!   stop reporting one
//! - **Command fan-out**: button presses and per-member position calls
//! - **Group management**: set up, unload, reload and update many groups
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use cover_group::{CoverGroup, CoverGroupConfig, HttpConfig, InMemoryRegistry};
//!
//! #[tokio::main]
//! async fn main() -> cover_group::Result<()> {
//!     let registry = Arc::new(InMemoryRegistry::new());
//!     let invoker = Arc::new(
//!         HttpConfig::new("homeassistant.local:8123")
//!             .with_token("long-lived-token")
//!             .into_caller()?,
//!     );
//!
//!     let config = CoverGroupConfig::new("Living Room")
//!         .with_cover("cover.living_left")
//!         .with_cover("cover.living_right")
//!         .with_open_button("button.pico_open")
//!         .with_close_button("button.pico_close")
//!         .with_stop_button("button.pico_stop");
//!
//!     let mut group = CoverGroup::new(config, registry, invoker)?;
//!     group.activate()?;
//!
//!     group.open().await?;
//!     group.set_position(Some(40)).await?;
//!
//!     let mut state = group.watch();
//!     state.changed().await.ok();
//!     println!("Living room is at {:?}", state.borrow().position);
//!     Ok(())
//! }
//! ```
//!
//! ## Feeding member states
//!
//! The host pushes member updates into the registry; every active group
//! watching that member reconciles on its own task.
//!
//! ```
//! use cover_group::{CoverLifecycle, InMemoryRegistry, MemberCoverState, Position};
//!
//! let registry = InMemoryRegistry::new();
//! registry.set_state(
//!     MemberCoverState::new("cover.living_left", CoverLifecycle::Open)
//!         .with_position(Position::new(80).unwrap()),
//! );
//! ```

pub mod actuator;
pub mod error;
pub mod event;
pub mod group;
pub mod manager;
pub mod registry;
pub mod state;
pub mod types;

#[cfg(feature = "http")]
pub use actuator::{HttpConfig, HttpServiceCaller};
pub use actuator::{ActuatorInvoker, ServiceCall};
pub use error::{ConfigError, Error, ProtocolError, Result, ValueError};
pub use event::{EventBus, GroupEvent, GroupId};
pub use group::{CoverCommand, CoverFeatures, CoverGroup, CoverGroupConfig};
pub use manager::GroupManager;
pub use registry::{InMemoryRegistry, StateRegistry};
pub use state::{DerivedState, MemberCoverState};
pub use types::{CoverLifecycle, EntityId, Position};
