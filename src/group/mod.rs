// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cover groups.
//!
//! A [`CoverGroup`] is one virtual cover backed by several physical ones.
//! It is built from a [`CoverGroupConfig`], tracks its members through a
//! [`StateRegistry`](crate::registry::StateRegistry), and accepts
//! [`CoverCommand`]s that it forwards through an
//! [`ActuatorInvoker`](crate::actuator::ActuatorInvoker).
//!
//! # State flow
//!
//! ```text
//! registry change ──► subscription ──► reconcile ──► watch::Sender<DerivedState>
//! caller intent   ──► execute      ──► ServiceCall ──► invoker
//! ```
//!
//! Dispatch never feeds back into the state: the next registry change,
//! emitted once the devices move, drives the next reconciliation.

mod command;
mod config;
mod cover_group;

pub use command::{CoverCommand, CoverFeatures};
pub use config::CoverGroupConfig;
pub use cover_group::CoverGroup;
