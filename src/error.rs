// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the cover group library.
//!
//! A missing member snapshot is never an error: it is modelled as `None`
//! and simply excluded from aggregation. The errors below cover programmer
//! mistakes (activation misuse), invalid configuration and actuator
//! transport failures. [`ValueError`] is returned directly by the value
//! type constructors.

use thiserror::Error;

use crate::types::EntityId;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The group is already tracking its members.
    #[error("cover group is already active")]
    AlreadyActive,

    /// A command was issued to a group that has not been activated.
    #[error("cover group is not active")]
    NotActive,

    /// The group was not found in the manager.
    #[error("cover group not found")]
    GroupNotFound,

    /// The group configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An actuator call could not be delivered.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// A cover lifecycle string was not recognised.
    #[error("invalid cover state: {0}")]
    InvalidLifecycle(String),
}

/// Errors raised while validating a [`CoverGroupConfig`](crate::group::CoverGroupConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The group name is empty or whitespace.
    #[error("group name must not be empty")]
    EmptyName,

    /// No member cover was selected.
    #[error("no covers selected")]
    NoCovers,

    /// The same cover appears twice in the member list.
    #[error("cover {0} is listed more than once")]
    DuplicateCover(EntityId),

    /// Two of the open/close/stop buttons are the same entity.
    #[error("button {0} is assigned to more than one action")]
    DuplicateButton(EntityId),

    /// A button entity is also listed as a member cover.
    #[error("button {0} is also a member cover")]
    ButtonIsCover(EntityId),

    /// The configuration document could not be decoded.
    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to delivering actuator calls.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote endpoint answered with a non-success status.
    #[error("request failed with status {status}: {reason}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase, if any.
        reason: String,
    },

    /// Authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The host refused to accept the call.
    #[error("call rejected: {0}")]
    Rejected(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
