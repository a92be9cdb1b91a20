// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for cover groups.
//!
//! # Types
//!
//! - [`EntityId`] - Opaque identifier of a member cover or button
//! - [`Position`] - Cover position (0-100%)
//! - [`CoverLifecycle`] - Open/Opening/Closing/Closed/Unknown motion state

mod entity_id;
mod lifecycle;
mod position;

pub use entity_id::EntityId;
pub use lifecycle::CoverLifecycle;
pub use position::Position;
