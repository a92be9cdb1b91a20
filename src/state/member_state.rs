// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshot of a single member cover.

use serde::{Deserialize, Serialize};

use crate::types::{CoverLifecycle, EntityId, Position};

/// Attribute key under which hosts report a cover's numeric position.
pub const CURRENT_POSITION_ATTRIBUTE: &str = "current_position";

/// Latest known state of one member cover.
///
/// Snapshots are owned by the registry and handed out by value. A member
/// without any snapshot is represented as `None` by the registry, which is
/// different from a snapshot whose lifecycle is [`CoverLifecycle::Unknown`].
///
/// # Examples
///
/// ```
/// use cover_group::state::MemberCoverState;
/// use cover_group::types::{CoverLifecycle, Position};
///
/// let state = MemberCoverState::new("cover.left", CoverLifecycle::Open)
///     .with_position(Position::new(40).unwrap());
/// assert_eq!(state.position().map(|p| p.value()), Some(40));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberCoverState {
    entity_id: EntityId,
    lifecycle: CoverLifecycle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<f64>,
}

impl MemberCoverState {
    /// Creates a snapshot without a numeric position.
    #[must_use]
    pub fn new(entity_id: impl Into<EntityId>, lifecycle: CoverLifecycle) -> Self {
        Self {
            entity_id: entity_id.into(),
            lifecycle,
            position: None,
        }
    }

    /// Builds a snapshot from the host's raw representation: a state string
    /// and a JSON attribute object.
    ///
    /// Unrecognised state strings become [`CoverLifecycle::Unknown`]. The
    /// `current_position` attribute is used when it is a JSON number and is
    /// kept as reported, fractions included, so group averages are taken on
    /// the raw values.
    ///
    /// # Examples
    ///
    /// ```
    /// use cover_group::state::MemberCoverState;
    /// use cover_group::types::CoverLifecycle;
    ///
    /// let attributes = serde_json::json!({ "current_position": 62.7 });
    /// let state = MemberCoverState::from_host("cover.left", "closing", &attributes);
    /// assert_eq!(state.lifecycle(), CoverLifecycle::Closing);
    /// assert_eq!(state.reported_position(), Some(62.7));
    /// assert_eq!(state.position().map(|p| p.value()), Some(63));
    /// ```
    #[must_use]
    pub fn from_host(
        entity_id: impl Into<EntityId>,
        state: &str,
        attributes: &serde_json::Value,
    ) -> Self {
        let position = attributes
            .get(CURRENT_POSITION_ATTRIBUTE)
            .and_then(serde_json::Value::as_f64);

        Self {
            entity_id: entity_id.into(),
            lifecycle: CoverLifecycle::from_host_state(state),
            position,
        }
    }

    /// Sets the reported position.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(f64::from(position.value()));
        self
    }

    /// Sets a raw reported position, which may be fractional.
    #[must_use]
    pub fn with_reported_position(mut self, value: f64) -> Self {
        self.position = Some(value);
        self
    }

    /// Returns the member's identifier.
    #[must_use]
    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    /// Returns the reported lifecycle.
    #[must_use]
    pub fn lifecycle(&self) -> CoverLifecycle {
        self.lifecycle
    }

    /// Returns the reported position rounded to a whole percentage, if the
    /// device reports one.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.position.and_then(Position::from_reported)
    }

    /// Returns the raw reported position clamped into 0-100.
    ///
    /// NaN and infinities read as no position.
    #[must_use]
    pub fn reported_position(&self) -> Option<f64> {
        self.position
            .filter(|value| value.is_finite())
            .map(|value| value.clamp(0.0, 100.0))
    }
}
