// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cover lifecycle states.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Motion state reported by a cover.
///
/// # Examples
///
/// ```
/// use cover_group::types::CoverLifecycle;
///
/// let state: CoverLifecycle = "opening".parse().unwrap();
/// assert_eq!(state, CoverLifecycle::Opening);
/// assert!(state.is_moving());
///
/// // Host states that are not cover states collapse to Unknown
/// assert_eq!(CoverLifecycle::from_host_state("unavailable"), CoverLifecycle::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverLifecycle {
    /// The cover is at rest and not fully closed.
    Open,
    /// The cover is moving towards open.
    Opening,
    /// The cover is moving towards closed.
    Closing,
    /// The cover is fully closed.
    Closed,
    /// The device reported a state, but not a known one.
    #[default]
    Unknown,
}

impl CoverLifecycle {
    /// Returns the lowercase state name used by the host.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Opening => "opening",
            Self::Closing => "closing",
            Self::Closed => "closed",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` while the cover is in motion.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }

    /// Maps any host state string to a lifecycle.
    ///
    /// Unlike [`FromStr`], this never fails: states such as `unavailable`
    /// become [`Unknown`](Self::Unknown).
    #[must_use]
    pub fn from_host_state(state: &str) -> Self {
        state.parse().unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for CoverLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverLifecycle {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "opening" => Ok(Self::Opening),
            "closing" => Ok(Self::Closing),
            "closed" => Ok(Self::Closed),
            "unknown" => Ok(Self::Unknown),
            _ => Err(ValueError::InvalidLifecycle(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_states() {
        assert_eq!("open".parse::<CoverLifecycle>(), Ok(CoverLifecycle::Open));
        assert_eq!("CLOSING".parse::<CoverLifecycle>(), Ok(CoverLifecycle::Closing));
        assert_eq!("closed".parse::<CoverLifecycle>(), Ok(CoverLifecycle::Closed));
    }

    #[test]
    fn parse_rejects_other_states() {
        assert_eq!(
            "unavailable".parse::<CoverLifecycle>(),
            Err(ValueError::InvalidLifecycle("unavailable".to_string()))
        );
    }

    #[test]
    fn host_state_is_lenient() {
        assert_eq!(CoverLifecycle::from_host_state("opening"), CoverLifecycle::Opening);
        assert_eq!(CoverLifecycle::from_host_state(""), CoverLifecycle::Unknown);
        assert_eq!(CoverLifecycle::from_host_state("unavailable"), CoverLifecycle::Unknown);
    }

    #[test]
    fn moving_states() {
        assert!(CoverLifecycle::Opening.is_moving());
        assert!(CoverLifecycle::Closing.is_moving());
        assert!(!CoverLifecycle::Open.is_moving());
        assert!(!CoverLifecycle::Closed.is_moving());
        assert!(!CoverLifecycle::Unknown.is_moving());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&CoverLifecycle::Closing).unwrap();
        assert_eq!(json, "\"closing\"");
    }
}
