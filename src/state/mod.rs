// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Member snapshots and the aggregate state computed from them.
//!
//! [`MemberCoverState`] is what the registry knows about one physical cover.
//! [`DerivedState`] is the group's own observable state, recomputed from the
//! full set of member snapshots on every change.
//!
//! # Examples
//!
//! ```
//! use cover_group::state::{DerivedState, MemberCoverState};
//! use cover_group::types::CoverLifecycle;
//!
//! let members = [
//!     MemberCoverState::new("cover.a", CoverLifecycle::Closed),
//!     MemberCoverState::new("cover.b", CoverLifecycle::Closed),
//! ];
//!
//! let state = DerivedState::reconcile(None, &members);
//! assert_eq!(state.is_closed, Some(true));
//! ```

mod derived_state;
mod member_state;

pub use derived_state::DerivedState;
pub use member_state::{CURRENT_POSITION_ATTRIBUTE, MemberCoverState};
