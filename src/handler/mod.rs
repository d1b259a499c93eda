// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Message handlers attached to the event dispatcher.
//!
//! A handler receives every dispatched frame, decides relevance itself,
//! and acts. Handlers are declared in configuration through the tagged
//! [`HandlerConfig`] variants; today there is exactly one kind, the
//! switch-status mirror.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::event::PushMessage;

mod mirror;

pub use mirror::MirrorSwitchStatus;

/// A named, stateful message handler.
///
/// `handle` is invoked once per dispatched frame, never concurrently
/// with itself, and must not panic: internal failures are routed to the
/// error notifier so one handler's fault cannot break dispatch to the
/// handlers after it.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Processes one dispatched frame.
    async fn handle(&self, message: &PushMessage);
}

/// Declarative handler configuration, provided at startup.
///
/// The `kind` tag selects the handler implementation; device references
/// are by human-readable name and are resolved against the device
/// directory when the handler is constructed.
///
/// # Examples
///
/// ```
/// use mirrorlink::handler::HandlerConfig;
///
/// let config: HandlerConfig = serde_json::from_str(r#"{
///     "kind": "mirror_switch_status",
///     "short_name": "desk-mirror",
///     "source_device_name": "Desk Lamp",
///     "satellite_device_name": "Hall Light"
/// }"#).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandlerConfig {
    /// Mirror the on/off state of a source device onto a satellite.
    MirrorSwitchStatus {
        /// Handler name used in logs.
        short_name: String,
        /// Name of the device whose state is mirrored.
        source_device_name: String,
        /// Name of the device receiving the mirrored state.
        satellite_device_name: String,
    },
}

impl HandlerConfig {
    /// Returns the handler's short name.
    #[must_use]
    pub fn short_name(&self) -> &str {
        match self {
            Self::MirrorSwitchStatus { short_name, .. } => short_name,
        }
    }
}
