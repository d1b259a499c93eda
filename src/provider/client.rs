// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the provider device-control API.
//!
//! The provider API is treated as an opaque capability set: enumerate
//! devices, authenticate, query a power state, set a power state, open
//! the push channel. Its transport details stop at this module.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ProviderError, TransportError};
use crate::provider::channel::{EventChannel, EventLink, WsEventChannel};
use crate::provider::control::PowerControl;
use crate::types::{DeviceId, DeviceRecord, SwitchState};

/// Provider account credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Provider region code, e.g. `"eu"`.
    pub region: String,
}

/// Configuration for the provider API client.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use mirrorlink::provider::{Credentials, ProviderConfig};
///
/// let credentials = Credentials {
///     email: "me@example.com".to_string(),
///     password: "secret".to_string(),
///     region: "eu".to_string(),
/// };
///
/// let config = ProviderConfig::new("https://api.example.com", credentials)
///     .with_ws_url("wss://push.example.com/api/ws")
///     .with_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    base_url: String,
    ws_url: String,
    credentials: Credentials,
    timeout: Duration,
}

impl ProviderConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the given API base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        let base_url = base_url.into();
        let ws_url = base_url
            .replacen("https://", "wss://", 1)
            .replacen("http://", "ws://", 1)
            + "/api/ws";
        Self {
            base_url,
            ws_url,
            credentials,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the push-channel URL.
    #[must_use]
    pub fn with_ws_url(mut self, ws_url: impl Into<String>) -> Self {
        self.ws_url = ws_url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates a [`CloudClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<CloudClient, ProviderError> {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProviderError::Http)?;

        Ok(CloudClient {
            http,
            base_url: self.base_url,
            ws_url: self.ws_url,
            credentials: self.credentials,
            token: RwLock::new(None),
        })
    }
}

/// Provider API client.
///
/// Holds the session token obtained by [`login`](Self::login); all other
/// calls require a prior successful login.
pub struct CloudClient {
    http: Client,
    base_url: String,
    ws_url: String,
    credentials: Credentials,
    token: RwLock<Option<String>>,
}

/// Response envelope shared by all provider endpoints.
///
/// `error` is absent or `0` on success; anything else carries `msg`.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    error: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    at: Option<String>,
    #[serde(default)]
    devicelist: Vec<DeviceRecord>,
    #[serde(default)]
    state: Option<String>,
}

impl ApiEnvelope {
    /// Converts a provider-reported error code into a `ProviderError`.
    fn check(self) -> Result<Self, ProviderError> {
        if self.error == 0 {
            Ok(self)
        } else {
            Err(ProviderError::Api {
                code: self.error,
                message: self.msg,
            })
        }
    }

    /// Like [`check`](Self::check), but surfaces rejections as
    /// authentication failures.
    fn map_auth_error(self) -> Result<Self, ProviderError> {
        if self.error == 0 {
            Ok(self)
        } else {
            Err(ProviderError::AuthenticationFailed(format!(
                "error {}: {}",
                self.error, self.msg
            )))
        }
    }
}

impl CloudClient {
    /// Authenticates and stores the session token.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::AuthenticationFailed`] when the provider
    /// rejects the credentials, or a transport error.
    pub async fn login(&self) -> Result<(), ProviderError> {
        tracing::debug!(region = %self.credentials.region, "logging in");

        let url = format!("{}/user/login", self.base_url);
        let envelope: ApiEnvelope = self
            .http
            .post(&url)
            .json(&self.credentials)
            .send()
            .await?
            .json()
            .await?;

        let envelope = envelope.map_auth_error()?;
        let token = envelope
            .at
            .ok_or_else(|| ProviderError::UnexpectedResponse("login reply without token".into()))?;

        *self.token.write() = Some(token);
        tracing::info!("provider session established");
        Ok(())
    }

    /// Fetches the account's device listing.
    ///
    /// # Errors
    ///
    /// Returns a provider or transport error. Requires a prior login.
    pub async fn devices(&self) -> Result<Vec<DeviceRecord>, ProviderError> {
        let url = format!("{}/user/device", self.base_url);
        let envelope: ApiEnvelope = self
            .http
            .get(&url)
            .bearer_auth(self.token()?)
            .send()
            .await?
            .json()
            .await?;

        let envelope = envelope.check()?;
        tracing::debug!(count = envelope.devicelist.len(), "device listing loaded");
        Ok(envelope.devicelist)
    }

    /// Builds the handshake frame sent after the push connection opens.
    fn handshake(&self, token: &str) -> String {
        json!({
            "action": "userOnline",
            "at": token,
            "ts": chrono::Utc::now().timestamp(),
            "nonce": uuid::Uuid::new_v4().to_string(),
        })
        .to_string()
    }

    fn token(&self) -> Result<String, ProviderError> {
        self.token
            .read()
            .clone()
            .ok_or_else(|| ProviderError::AuthenticationFailed("no session, login first".into()))
    }
}

#[async_trait]
impl crate::provider::ProviderSession for CloudClient {
    async fn login(&self) -> Result<(), ProviderError> {
        CloudClient::login(self).await
    }

    async fn devices(&self) -> Result<Vec<DeviceRecord>, ProviderError> {
        CloudClient::devices(self).await
    }
}

#[async_trait]
impl PowerControl for CloudClient {
    async fn query_power_state(
        &self,
        id: &DeviceId,
    ) -> Result<Option<SwitchState>, ProviderError> {
        let url = format!("{}/user/device/status", self.base_url);
        let envelope: ApiEnvelope = self
            .http
            .get(&url)
            .bearer_auth(self.token()?)
            .query(&[("deviceid", id.as_str()), ("params", "switch")])
            .send()
            .await?
            .json()
            .await?;

        let envelope = envelope.check()?;
        Ok(envelope
            .state
            .as_deref()
            .and_then(SwitchState::from_provider))
    }

    async fn set_power_state(
        &self,
        id: &DeviceId,
        state: SwitchState,
    ) -> Result<(), ProviderError> {
        let url = format!("{}/user/device/status", self.base_url);
        let body = json!({
            "deviceid": id.as_str(),
            "params": { "switch": state.as_str() },
        });

        let envelope: ApiEnvelope = self
            .http
            .post(&url)
            .bearer_auth(self.token()?)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        envelope.check()?;
        Ok(())
    }
}

#[async_trait]
impl EventLink for CloudClient {
    async fn open(&self) -> Result<Box<dyn EventChannel>, TransportError> {
        let token = self
            .token()
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        let handshake = self.handshake(&token);
        let channel = WsEventChannel::connect(&self.ws_url, handshake).await?;
        Ok(Box::new(channel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            email: "me@example.com".to_string(),
            password: "secret".to_string(),
            region: "eu".to_string(),
        }
    }

    #[test]
    fn ws_url_derived_from_base_url() {
        let config = ProviderConfig::new("https://api.example.com", credentials());
        assert_eq!(config.ws_url, "wss://api.example.com/api/ws");

        let config = ProviderConfig::new("http://localhost:8080", credentials());
        assert_eq!(config.ws_url, "ws://localhost:8080/api/ws");
    }

    #[test]
    fn ws_url_override() {
        let config = ProviderConfig::new("https://api.example.com", credentials())
            .with_ws_url("wss://push.example.com/ws");
        assert_eq!(config.ws_url, "wss://push.example.com/ws");
    }

    #[test]
    fn envelope_check_maps_error_code() {
        let envelope: ApiEnvelope =
            serde_json::from_str(r#"{"error": 503, "msg": "offline"}"#).unwrap();
        let err = envelope.check().unwrap_err();
        assert!(err.is_device_offline());
    }

    #[test]
    fn envelope_defaults_to_success() {
        let envelope: ApiEnvelope = serde_json::from_str(r#"{"state": "on"}"#).unwrap();
        let envelope = envelope.check().unwrap();
        assert_eq!(envelope.state.as_deref(), Some("on"));
    }

    #[test]
    fn calls_without_login_fail() {
        let client = ProviderConfig::new("https://api.example.com", credentials())
            .into_client()
            .unwrap();
        assert!(matches!(
            client.token(),
            Err(ProviderError::AuthenticationFailed(_))
        ));
    }

    #[test]
    fn handshake_carries_token() {
        let client = ProviderConfig::new("https://api.example.com", credentials())
            .into_client()
            .unwrap();
        let frame: serde_json::Value =
            serde_json::from_str(&client.handshake("tok-123")).unwrap();
        assert_eq!(frame["action"], "userOnline");
        assert_eq!(frame["at"], "tok-123");
        assert!(frame["ts"].is_i64());
        assert!(frame["nonce"].is_string());
    }
}
