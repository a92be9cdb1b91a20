// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Commands accepted by a cover group.

use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// A caller intent for a cover group.
///
/// # Examples
///
/// ```
/// use cover_group::group::CoverCommand;
/// use cover_group::types::Position;
///
/// let command = CoverCommand::SetPosition(Some(150));
/// assert_eq!(command.target(), Some(Position::OPEN));
///
/// // A missing target means there is nothing to do
/// assert_eq!(CoverCommand::SetPosition(None).target(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "command", content = "position")]
pub enum CoverCommand {
    /// Press the open button.
    Open,
    /// Press the close button.
    Close,
    /// Press the stop button.
    Stop,
    /// Move every member to a position. Out-of-range targets are clamped.
    SetPosition(Option<i64>),
}

impl CoverCommand {
    /// Returns the clamped target of a set-position command.
    #[must_use]
    pub fn target(&self) -> Option<Position> {
        match self {
            Self::SetPosition(Some(target)) => Some(Position::saturating_from(*target)),
            _ => None,
        }
    }

    /// Returns the feature a group must support to accept this command.
    #[must_use]
    pub fn required_feature(&self) -> CoverFeatures {
        match self {
            Self::Open => CoverFeatures::OPEN,
            Self::Close => CoverFeatures::CLOSE,
            Self::Stop => CoverFeatures::STOP,
            Self::SetPosition(_) => CoverFeatures::SET_POSITION,
        }
    }
}

impl fmt::Display for CoverCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Close => f.write_str("close"),
            Self::Stop => f.write_str("stop"),
            Self::SetPosition(Some(target)) => write!(f, "set_position({target})"),
            Self::SetPosition(None) => f.write_str("set_position(none)"),
        }
    }
}

/// Set of commands a cover advertises to its host.
///
/// # Examples
///
/// ```
/// use cover_group::group::CoverFeatures;
///
/// let features = CoverFeatures::OPEN | CoverFeatures::CLOSE;
/// assert!(features.contains(CoverFeatures::OPEN));
/// assert!(!features.contains(CoverFeatures::STOP));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoverFeatures(u8);

impl CoverFeatures {
    /// No features.
    pub const NONE: Self = Self(0);
    /// Supports opening.
    pub const OPEN: Self = Self(1);
    /// Supports closing.
    pub const CLOSE: Self = Self(2);
    /// Supports moving to a position.
    pub const SET_POSITION: Self = Self(4);
    /// Supports stopping.
    pub const STOP: Self = Self(8);

    /// Returns `true` if every feature in `other` is present.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the raw bit mask.
    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.0
    }
}

impl BitOr for CoverFeatures {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}
