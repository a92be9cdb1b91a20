// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP service-call invoker.

use std::time::Duration;

use reqwest::Client;

use crate::error::ProtocolError;

use super::{ActuatorInvoker, ServiceCall};

// ============================================================================
// HttpConfig
// ============================================================================

/// Configuration for an [`HttpServiceCaller`].
///
/// # Examples
///
/// ```
/// use cover_group::actuator::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("http://homeassistant.local:8123")
///     .with_token("long-lived-token")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url(), "http://homeassistant.local:8123");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl HttpConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the given host.
    ///
    /// A bare host is prefixed with `http://`; a trailing `/` is removed.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        let host = host.into();
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host
        } else {
            format!("http://{host}")
        };

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the bearer token sent with every call.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates an `HttpServiceCaller` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is empty or the HTTP client cannot be
    /// created.
    pub fn into_caller(self) -> Result<HttpServiceCaller, ProtocolError> {
        let has_host = reqwest::Url::parse(&self.base_url)
            .ok()
            .is_some_and(|url| url.host_str().is_some_and(|host| !host.is_empty()));
        if !has_host {
            return Err(ProtocolError::InvalidAddress(self.base_url));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpServiceCaller {
            base_url: self.base_url,
            token: self.token,
            client,
        })
    }
}

// ============================================================================
// HttpServiceCaller
// ============================================================================

/// Invoker that posts service calls to `{base_url}/api/services/{domain}/{service}`.
///
/// The body is the call's data plus `entity_id`, encoded as JSON.
///
/// # Examples
///
/// ```no_run
/// use cover_group::actuator::{ActuatorInvoker, HttpConfig, ServiceCall};
/// use cover_group::types::EntityId;
///
/// # async fn example() -> Result<(), cover_group::ProtocolError> {
/// let caller = HttpConfig::new("homeassistant.local:8123")
///     .with_token("token")
///     .into_caller()?;
///
/// caller
///     .invoke(&ServiceCall::button_press(EntityId::new("button.pico_open")))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpServiceCaller {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl HttpServiceCaller {
    /// Returns the base URL of the host.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, call: &ServiceCall) -> String {
        format!(
            "{}/api/services/{}/{}",
            self.base_url,
            urlencoding::encode(call.domain()),
            urlencoding::encode(call.service())
        )
    }
}

impl ActuatorInvoker for HttpServiceCaller {
    async fn invoke(&self, call: &ServiceCall) -> Result<(), ProtocolError> {
        let url = self.build_url(call);

        tracing::debug!(url = %url, call = %call, "Sending HTTP service call");

        let mut request = self.client.post(&url).json(&call.body());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(ProtocolError::Http)?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProtocolError::AuthenticationFailed);
        }

        if !response.status().is_success() {
            return Err(ProtocolError::RequestFailed {
                status: response.status().as_u16(),
                reason: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown")
                    .to_string(),
            });
        }

        Ok(())
    }
}
