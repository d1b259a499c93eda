// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Startup configuration.
//!
//! Everything the daemon needs is declared here once and never changes
//! afterward. Loading and file-format choice belong to the embedding
//! process; these types only carry the serde derives.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::handler::HandlerConfig;
use crate::provider::Credentials;

/// Seconds between connection-supervision checks.
///
/// Chosen to exceed the provider's heartbeat period so a missed
/// heartbeat is reliably observed at the next check.
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 65;

/// Full startup configuration for the mirror daemon.
///
/// # Examples
///
/// ```
/// let config: mirrorlink::MirrorConfig = serde_json::from_str(r#"{
///     "api_url": "https://api.example.com",
///     "credentials": {
///         "email": "me@example.com",
///         "password": "secret",
///         "region": "eu"
///     },
///     "handlers": [{
///         "kind": "mirror_switch_status",
///         "short_name": "desk-mirror",
///         "source_device_name": "Desk Lamp",
///         "satellite_device_name": "Hall Light"
///     }]
/// }"#).unwrap();
///
/// assert!(config.notify_on_error);
/// assert!(!config.notify_on_close);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Provider API base URL, e.g. `https://api.example.com`.
    pub api_url: String,
    /// Push-channel URL; derived from `api_url` when absent.
    #[serde(default)]
    pub ws_url: Option<String>,
    /// Provider account credentials.
    pub credentials: Credentials,
    /// Handlers to construct and attach at startup.
    pub handlers: Vec<HandlerConfig>,
    /// Whether a clean connection close triggers an operator notice.
    /// Off by default: provider-side closes are routine.
    #[serde(default)]
    pub notify_on_close: bool,
    /// Whether a socket error triggers an operator notice.
    #[serde(default = "default_true")]
    pub notify_on_error: bool,
    /// Seconds between supervision checks of the push connection.
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,
}

impl MirrorConfig {
    /// Returns the supervision check interval as a [`Duration`].
    #[must_use]
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }
}

fn default_true() -> bool {
    true
}

fn default_check_interval() -> u64 {
    DEFAULT_CHECK_INTERVAL_SECS
}
