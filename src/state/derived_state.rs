// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Aggregate state of a cover group.

use serde::{Deserialize, Serialize};

use crate::types::{CoverLifecycle, Position};

use super::MemberCoverState;

/// Observable state of a cover group, computed from its members.
///
/// A `DerivedState` is never edited in place. Every member change produces a
/// fresh value through [`reconcile`](Self::reconcile), which replaces the
/// previous one wholesale.
///
/// # Examples
///
/// ```
/// use cover_group::state::{DerivedState, MemberCoverState};
/// use cover_group::types::{CoverLifecycle, Position};
///
/// let members = [
///     MemberCoverState::new("cover.a", CoverLifecycle::Open).with_position(Position::new(20).unwrap()),
///     MemberCoverState::new("cover.b", CoverLifecycle::Opening).with_position(Position::new(30).unwrap()),
/// ];
///
/// let state = DerivedState::reconcile(None, &members);
/// assert_eq!(state.position, Some(Position::new(25).unwrap()));
/// assert!(state.is_open);
/// assert!(state.is_opening);
/// assert_eq!(state.is_closed, None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedState {
    /// Mean position of the members that report one.
    pub position: Option<Position>,
    /// At least one member is open.
    pub is_open: bool,
    /// At least one member is opening.
    pub is_opening: bool,
    /// At least one member is closing.
    pub is_closing: bool,
    /// Every member is closed. `None` while any member is moving or when
    /// no member has reported at all.
    pub is_closed: Option<bool>,
}

impl DerivedState {
    /// Computes the group state from the present member snapshots.
    ///
    /// `previous_position` is the position of the state being replaced.
    /// It is kept when members are present but none of them reports a
    /// numeric position, and dropped when no member is present at all.
    ///
    /// The mean is taken over the raw reported values, fractions included,
    /// and only then rounded, ties going to the nearest even integer.
    #[must_use]
    pub fn reconcile(previous_position: Option<Position>, snapshots: &[MemberCoverState]) -> Self {
        if snapshots.is_empty() {
            return Self::default();
        }

        let reports: Vec<f64> = snapshots
            .iter()
            .filter_map(MemberCoverState::reported_position)
            .collect();
        let position = rounded_mean(&reports).or(previous_position);

        let has = |lifecycle: CoverLifecycle| snapshots.iter().any(|s| s.lifecycle() == lifecycle);
        let is_opening = has(CoverLifecycle::Opening);
        let is_closing = has(CoverLifecycle::Closing);
        let is_open = has(CoverLifecycle::Open);

        let is_closed = if is_opening || is_closing {
            None
        } else {
            Some(
                snapshots
                    .iter()
                    .all(|s| s.lifecycle() == CoverLifecycle::Closed),
            )
        };

        Self {
            position,
            is_open,
            is_opening,
            is_closing,
            is_closed,
        }
    }

    /// Returns `true` while any member is moving.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.is_opening || self.is_closing
    }

    /// Collapses the flags into the single state string a host displays.
    ///
    /// Motion wins over rest states; an undetermined `is_closed` is
    /// reported as [`CoverLifecycle::Unknown`].
    #[must_use]
    pub fn lifecycle(&self) -> CoverLifecycle {
        if self.is_opening {
            CoverLifecycle::Opening
        } else if self.is_closing {
            CoverLifecycle::Closing
        } else {
            match self.is_closed {
                Some(true) => CoverLifecycle::Closed,
                Some(false) => CoverLifecycle::Open,
                None => CoverLifecycle::Unknown,
            }
        }
    }
}

/// Arithmetic mean of the raw reports, rounded half to even.
fn rounded_mean(reports: &[f64]) -> Option<Position> {
    let count = u32::try_from(reports.len()).ok().filter(|&n| n > 0)?;
    let sum: f64 = reports.iter().sum();

    Position::from_reported(sum / f64::from(count))
}
