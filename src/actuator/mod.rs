// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Actuator invocation.
//!
//! Cover groups never talk to hardware directly. Every command becomes a
//! [`ServiceCall`] handed to an [`ActuatorInvoker`]: `button.press` for the
//! open/close/stop buttons and `cover.set_cover_position` for members.
//!
//! # Invokers
//!
//! - [`HttpServiceCaller`]: posts calls to a REST service endpoint
//!   (requires the `http` feature)
//! - any host type implementing [`ActuatorInvoker`]

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpConfig, HttpServiceCaller};

use std::fmt;

use serde_json::{Map, Value};

use crate::error::ProtocolError;
use crate::types::{EntityId, Position};

/// Service domain for button entities.
pub const BUTTON_DOMAIN: &str = "button";
/// Service domain for cover entities.
pub const COVER_DOMAIN: &str = "cover";
/// Service that presses a button.
pub const SERVICE_PRESS: &str = "press";
/// Service that moves a cover to a position.
pub const SERVICE_SET_COVER_POSITION: &str = "set_cover_position";
/// Data key carrying the target position.
pub const ATTR_POSITION: &str = "position";

/// A single call addressed to one entity.
///
/// # Examples
///
/// ```
/// use cover_group::actuator::ServiceCall;
/// use cover_group::types::{EntityId, Position};
///
/// let press = ServiceCall::button_press(EntityId::new("button.pico_open"));
/// assert_eq!(press.to_string(), "button.press(button.pico_open)");
/// assert!(press.data().is_empty());
///
/// let move_to = ServiceCall::set_cover_position(EntityId::new("cover.left"), Position::OPEN);
/// assert_eq!(
///     move_to.body(),
///     serde_json::json!({ "entity_id": "cover.left", "position": 100 })
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCall {
    domain: &'static str,
    service: &'static str,
    entity_id: EntityId,
    data: Map<String, Value>,
}

impl ServiceCall {
    /// Creates a call with no data beyond the target entity.
    #[must_use]
    pub fn new(domain: &'static str, service: &'static str, entity_id: EntityId) -> Self {
        Self {
            domain,
            service,
            entity_id,
            data: Map::new(),
        }
    }

    /// A `button.press` call.
    #[must_use]
    pub fn button_press(entity_id: EntityId) -> Self {
        Self::new(BUTTON_DOMAIN, SERVICE_PRESS, entity_id)
    }

    /// A `cover.set_cover_position` call.
    #[must_use]
    pub fn set_cover_position(entity_id: EntityId, position: Position) -> Self {
        Self::new(COVER_DOMAIN, SERVICE_SET_COVER_POSITION, entity_id)
            .with_data(ATTR_POSITION, Value::from(position.value()))
    }

    /// Adds a data field.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Returns the service domain.
    #[must_use]
    pub fn domain(&self) -> &'static str {
        self.domain
    }

    /// Returns the service name.
    #[must_use]
    pub fn service(&self) -> &'static str {
        self.service
    }

    /// Returns the target entity.
    #[must_use]
    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    /// Returns the data fields.
    #[must_use]
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Returns the request body: the data fields plus `entity_id`.
    #[must_use]
    pub fn body(&self) -> Value {
        let mut body = self.data.clone();
        body.insert(
            "entity_id".to_string(),
            Value::from(self.entity_id.as_str()),
        );
        Value::Object(body)
    }
}

impl fmt::Display for ServiceCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}({})", self.domain, self.service, self.entity_id)
    }
}

/// Delivers service calls to the host.
///
/// Implementations should return as soon as the host has accepted the call;
/// callers never wait for the actuator to finish moving.
#[allow(async_fn_in_trait)]
pub trait ActuatorInvoker: Send + Sync {
    /// Sends one call.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the call could not be handed to the host.
    async fn invoke(&self, call: &ServiceCall) -> Result<(), ProtocolError>;
}

impl<T: ActuatorInvoker + ?Sized> ActuatorInvoker for std::sync::Arc<T> {
    async fn invoke(&self, call: &ServiceCall) -> Result<(), ProtocolError> {
        (**self).invoke(call).await
    }
}
