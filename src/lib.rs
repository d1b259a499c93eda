// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `mirrorlink` - mirror smart-switch power state across devices.
//!
//! This library keeps the on/off state of one cloud-connected
//! smart-switch (the *source*) mirrored onto one or more *satellite*
//! devices. It subscribes to the vendor's push-event stream, fans every
//! event out to a set of attached handlers, and re-issues power
//! commands through the vendor API when a handler decides an event is
//! relevant.
//!
//! The connection to the push stream is self-healing: a supervision
//! loop re-checks it on a fixed interval (65 s by default, longer than
//! the provider heartbeat) and reopens it after any close or error,
//! indefinitely. Nothing on the dispatch path can terminate the
//! process; only a failure during one-time startup (authentication,
//! device-directory load) is fatal.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use mirrorlink::{LogNotifier, MirrorConfig};
//!
//! #[tokio::main]
//! async fn main() -> mirrorlink::Result<()> {
//!     let config: MirrorConfig = serde_json::from_str(r#"{
//!         "api_url": "https://api.example.com",
//!         "credentials": {
//!             "email": "me@example.com",
//!             "password": "secret",
//!             "region": "eu"
//!         },
//!         "handlers": [{
//!             "kind": "mirror_switch_status",
//!             "short_name": "desk-mirror",
//!             "source_device_name": "Desk Lamp",
//!             "satellite_device_name": "Hall Light"
//!         }]
//!     }"#).expect("valid config");
//!
//!     // Runs until the process is killed.
//!     mirrorlink::daemon::run(config, Arc::new(LogNotifier)).await
//! }
//! ```
//!
//! # Custom handlers
//!
//! ```no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use mirrorlink::dispatch::EventSource;
//! use mirrorlink::event::PushMessage;
//! use mirrorlink::handler::MessageHandler;
//!
//! struct EventLogger;
//!
//! #[async_trait]
//! impl MessageHandler for EventLogger {
//!     fn name(&self) -> &str {
//!         "event-logger"
//!     }
//!
//!     async fn handle(&self, message: &PushMessage) {
//!         println!("saw {message:?}");
//!     }
//! }
//!
//! fn attach(dispatcher: &dyn EventSource) {
//!     dispatcher.attach(Arc::new(EventLogger));
//! }
//! ```

mod config;
pub mod daemon;
pub mod directory;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod handler;
pub mod notify;
pub mod provider;
pub mod types;

pub use config::{DEFAULT_CHECK_INTERVAL_SECS, MirrorConfig};
pub use directory::DeviceDirectory;
pub use dispatch::{DispatchConfig, Dispatcher, EventSource};
pub use error::{DirectoryError, Error, ProviderError, Result, TransportError};
pub use event::PushMessage;
pub use handler::{HandlerConfig, MessageHandler, MirrorSwitchStatus};
pub use notify::{LogNotifier, Notifier};
pub use provider::{CloudClient, Credentials, PowerControl, ProviderConfig, ProviderSession};
pub use types::{DeviceId, DeviceRecord, SwitchState};
