// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cover position type.
//!
//! This module provides a type-safe representation of cover positions,
//! ensuring values are always within the valid range of 0-100%.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Cover position as a percentage (0-100).
///
/// 0 is fully closed and 100 is fully open.
///
/// # Examples
///
/// ```
/// use cover_group::types::Position;
///
/// let half = Position::new(50).unwrap();
/// assert_eq!(half.value(), 50);
///
/// assert_eq!(Position::CLOSED.value(), 0);
/// assert_eq!(Position::OPEN.value(), 100);
///
/// // Out-of-range requests are clamped when saturating
/// assert_eq!(Position::saturating_from(150), Position::OPEN);
/// assert_eq!(Position::saturating_from(-5), Position::CLOSED);
///
/// assert!(Position::new(101).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Position(u8);

impl Position {
    /// Fully closed (0%).
    pub const CLOSED: Self = Self(0);

    /// Fully open (100%).
    pub const OPEN: Self = Self(100);

    /// Creates a new position.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates a position from any integer, clamping it into 0-100.
    #[must_use]
    pub fn saturating_from(value: i64) -> Self {
        u8::try_from(value.clamp(0, 100)).map_or(Self::OPEN, Self)
    }

    /// Creates a position from a reported floating point value.
    ///
    /// The value is clamped into 0-100 and rounded half to even.
    /// Returns `None` for NaN and infinities.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_reported(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // Safe: an integral value in 0.0..=100.0 at the cast
        Some(Self(value.clamp(0.0, 100.0).round_ties_even() as u8))
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns `true` for the fully closed position.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Position {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Position> for u8 {
    fn from(position: Position) -> Self {
        position.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_valid_values() {
        for v in 0..=100 {
            assert_eq!(Position::new(v).unwrap().value(), v);
        }
    }

    #[test]
    fn position_invalid_value() {
        assert_eq!(
            Position::new(101),
            Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: 101
            })
        );
    }

    #[test]
    fn position_saturating_from() {
        assert_eq!(Position::saturating_from(42).value(), 42);
        assert_eq!(Position::saturating_from(150), Position::OPEN);
        assert_eq!(Position::saturating_from(-5), Position::CLOSED);
        assert_eq!(Position::saturating_from(i64::MAX), Position::OPEN);
        assert_eq!(Position::saturating_from(i64::MIN), Position::CLOSED);
    }

    #[test]
    fn position_from_reported() {
        assert_eq!(Position::from_reported(42.9).unwrap().value(), 43);
        assert_eq!(Position::from_reported(42.2).unwrap().value(), 42);
        assert_eq!(Position::from_reported(42.5).unwrap().value(), 42);
        assert_eq!(Position::from_reported(43.5).unwrap().value(), 44);
        assert_eq!(Position::from_reported(120.0), Some(Position::OPEN));
        assert_eq!(Position::from_reported(-3.5), Some(Position::CLOSED));
        assert_eq!(Position::from_reported(f64::NAN), None);
        assert_eq!(Position::from_reported(f64::INFINITY), None);
    }

    #[test]
    fn position_display() {
        assert_eq!(Position::new(75).unwrap().to_string(), "75%");
    }

    #[test]
    fn position_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<Position>("101").is_err());
        let position: Position = serde_json::from_str("30").unwrap();
        assert_eq!(position.value(), 30);
    }
}
