// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cover group configuration.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::EntityId;

/// Configuration of one cover group.
///
/// The serialized field names match the configuration entries produced by
/// the host's setup form, so stored entries can be decoded directly.
///
/// # Examples
///
/// ```
/// use cover_group::group::CoverGroupConfig;
///
/// let config = CoverGroupConfig::new("Living Room")
///     .with_cover("cover.living_left")
///     .with_cover("cover.living_right")
///     .with_open_button("button.pico_open")
///     .with_close_button("button.pico_close")
///     .with_stop_button("button.pico_stop");
///
/// assert!(config.validate().is_ok());
///
/// let json = r#"{
///     "name": "Office",
///     "covers": ["cover.office"],
///     "open_button": "button.o",
///     "close_button": "button.c",
///     "stop_button": "button.s"
/// }"#;
/// let config = CoverGroupConfig::from_json(json).unwrap();
/// assert_eq!(config.covers.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverGroupConfig {
    /// Display name of the group.
    pub name: String,
    /// Member covers.
    pub covers: Vec<EntityId>,
    /// Button pressed to open the group.
    pub open_button: EntityId,
    /// Button pressed to close the group.
    pub close_button: EntityId,
    /// Button pressed to stop the group.
    pub stop_button: EntityId,
}

impl CoverGroupConfig {
    /// Creates a configuration with no covers and empty button ids.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            covers: Vec::new(),
            open_button: EntityId::new(""),
            close_button: EntityId::new(""),
            stop_button: EntityId::new(""),
        }
    }

    /// Decodes and validates a JSON configuration entry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` if the document is malformed, or any
    /// validation error from [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Adds a member cover.
    #[must_use]
    pub fn with_cover(mut self, cover: impl Into<EntityId>) -> Self {
        self.covers.push(cover.into());
        self
    }

    /// Sets the open button.
    #[must_use]
    pub fn with_open_button(mut self, button: impl Into<EntityId>) -> Self {
        self.open_button = button.into();
        self
    }

    /// Sets the close button.
    #[must_use]
    pub fn with_close_button(mut self, button: impl Into<EntityId>) -> Self {
        self.close_button = button.into();
        self
    }

    /// Sets the stop button.
    #[must_use]
    pub fn with_stop_button(mut self, button: impl Into<EntityId>) -> Self {
        self.stop_button = button.into();
        self
    }

    /// Returns the three buttons in open, close, stop order.
    #[must_use]
    pub fn buttons(&self) -> [&EntityId; 3] {
        [&self.open_button, &self.close_button, &self.stop_button]
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// - `EmptyName` if the name is blank
    /// - `NoCovers` if no member cover is listed
    /// - `DuplicateCover` if a cover is listed twice
    /// - `DuplicateButton` if two actions share a button
    /// - `ButtonIsCover` if a button is also a member
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }

        if self.covers.is_empty() {
            return Err(ConfigError::NoCovers);
        }

        let mut covers = HashSet::with_capacity(self.covers.len());
        for cover in &self.covers {
            if !covers.insert(cover) {
                return Err(ConfigError::DuplicateCover(cover.clone()));
            }
        }

        let mut buttons = HashSet::with_capacity(3);
        for button in self.buttons() {
            if !buttons.insert(button) {
                return Err(ConfigError::DuplicateButton(button.clone()));
            }
            if covers.contains(button) {
                return Err(ConfigError::ButtonIsCover(button.clone()));
            }
        }

        Ok(())
    }
}
