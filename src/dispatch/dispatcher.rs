// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event dispatcher and connection supervision.
//!
//! The [`Dispatcher`] owns the one logical push-event subscription and
//! the ordered set of attached handlers. Every inbound frame is handed
//! to every handler, in attachment order, sequentially. The connection
//! is driven by a two-state supervision loop (`Disconnected` /
//! `Connected`): a lost connection is logged when observed, waited out
//! until the next supervision check, then reopened. The loop has no
//! terminal state; it runs until the process is killed.

use std::sync::Arc;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::config::{DEFAULT_CHECK_INTERVAL_SECS, MirrorConfig};
use crate::directory::{DeviceDirectory, UNKNOWN_DEVICE};
use crate::error::{DirectoryError, Result};
use crate::event::PushMessage;
use crate::handler::{HandlerConfig, MessageHandler, MirrorSwitchStatus};
use crate::notify::Notifier;
use crate::provider::{EventChannel, PowerControl, ProviderSession};

/// Tuning knobs for the dispatcher.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Interval between supervision checks of the connection.
    pub check_interval: Duration,
    /// Whether a clean connection close triggers an operator notice.
    pub notify_on_close: bool,
    /// Whether a socket error triggers an operator notice.
    pub notify_on_error: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS),
            notify_on_close: false,
            notify_on_error: true,
        }
    }
}

impl From<&MirrorConfig> for DispatchConfig {
    fn from(config: &MirrorConfig) -> Self {
        Self {
            check_interval: config.check_interval(),
            notify_on_close: config.notify_on_close,
            notify_on_error: config.notify_on_error,
        }
    }
}

/// Capability to register handlers and start dispatching.
#[async_trait]
pub trait EventSource {
    /// Registers a handler. Attaching the same instance twice (by
    /// identity) is a no-op that logs a warning.
    fn attach(&self, handler: Arc<dyn MessageHandler>);

    /// Runs one-time startup and then the supervision loop.
    ///
    /// Does not return during normal operation.
    ///
    /// # Errors
    ///
    /// Returns an error only for startup failures (authentication,
    /// directory load); those are the caller's single fatal class.
    async fn start(&self) -> Result<()>;
}

/// Supervision states of the push connection.
enum LinkState {
    /// No usable connection; one must be opened.
    Disconnected,
    /// A connection is open and frames are being pumped.
    Connected(Box<dyn EventChannel>),
}

/// Owns the push connection and fans every frame out to all handlers.
pub struct Dispatcher {
    provider: Arc<dyn ProviderSession>,
    notifier: Arc<dyn Notifier>,
    handler_configs: Vec<HandlerConfig>,
    handlers: RwLock<Vec<Arc<dyn MessageHandler>>>,
    directory: OnceLock<DeviceDirectory>,
    config: DispatchConfig,
}

impl Dispatcher {
    /// Creates a dispatcher for the given provider session.
    ///
    /// Handlers declared in `handler_configs` are constructed during
    /// [`start`](EventSource::start), once the device directory exists.
    #[must_use]
    pub fn new(
        provider: Arc<dyn ProviderSession>,
        handler_configs: Vec<HandlerConfig>,
        notifier: Arc<dyn Notifier>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            provider,
            notifier,
            handler_configs,
            handlers: RwLock::new(Vec::new()),
            directory: OnceLock::new(),
            config,
        }
    }

    /// Returns the device directory, if startup has built it.
    #[must_use]
    pub fn directory(&self) -> Option<&DeviceDirectory> {
        self.directory.get()
    }

    /// Returns the number of attached handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Constructs and attaches every configured handler.
    ///
    /// A handler whose device names fail to resolve is logged and
    /// omitted; the rest of the system proceeds without it.
    fn attach_configured(&self) {
        let Some(directory) = self.directory.get() else {
            return;
        };
        for config in &self.handler_configs {
            match self.build_handler(directory, config) {
                Ok(handler) => self.attach(handler),
                Err(e) => {
                    tracing::error!(
                        handler = config.short_name(),
                        error = %e,
                        "could not attach handler"
                    );
                }
            }
        }
    }

    fn build_handler(
        &self,
        directory: &DeviceDirectory,
        config: &HandlerConfig,
    ) -> std::result::Result<Arc<dyn MessageHandler>, DirectoryError> {
        match config {
            HandlerConfig::MirrorSwitchStatus {
                short_name,
                source_device_name,
                satellite_device_name,
            } => {
                let source = directory.resolve(source_device_name)?.clone();
                let satellite = directory.resolve(satellite_device_name)?.clone();
                let control: Arc<dyn PowerControl> = self.provider.clone();
                Ok(Arc::new(MirrorSwitchStatus::new(
                    short_name.clone(),
                    source,
                    satellite,
                    control,
                    self.notifier.clone(),
                )))
            }
        }
    }

    /// Parses one raw frame and hands it to every handler in attachment
    /// order, one at a time.
    async fn dispatch(&self, text: &str) {
        let message = PushMessage::parse(text);

        // Name resolution here is for the log line only; unknown devices
        // are expected on a stream we do not control.
        if let Some(id) = message.device_id() {
            let name = self
                .directory
                .get()
                .map_or(UNKNOWN_DEVICE, |d| d.resolve_name(id));
            tracing::debug!(device = %id, name, "message received");
        } else {
            tracing::debug!("message received");
        }

        let handlers: Vec<Arc<dyn MessageHandler>> = self.handlers.read().clone();
        for handler in handlers {
            handler.handle(&message).await;
        }
    }

    /// Runs the connection-supervision loop. Never returns.
    async fn supervise(&self) {
        let mut state = LinkState::Disconnected;

        loop {
            state = match state {
                LinkState::Disconnected => match self.provider.open().await {
                    Ok(channel) => {
                        tracing::info!("push connection open");
                        LinkState::Connected(channel)
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "could not open push connection");
                        if self.config.notify_on_error {
                            self.notifier.notify(&format!("push connection failed: {e}"));
                        }
                        tokio::time::sleep(self.config.check_interval).await;
                        LinkState::Disconnected
                    }
                },
                LinkState::Connected(mut channel) => {
                    self.pump(channel.as_mut()).await;
                    tracing::warn!("push connection lost, reopening");
                    LinkState::Disconnected
                }
            };
        }
    }

    /// Reads frames from one connection until a supervision check finds
    /// it dead.
    ///
    /// A close or error is logged (and notified per configuration) the
    /// moment it is observed, but reconnection waits for the check
    /// boundary so a flapping provider cannot drive a reconnect storm.
    /// A connection that delivers nothing for a whole interval, not
    /// even a heartbeat, is presumed dead and replaced as well.
    async fn pump(&self, channel: &mut dyn EventChannel) {
        let mut lost = false;

        loop {
            let check = tokio::time::sleep(self.config.check_interval);
            tokio::pin!(check);
            let mut saw_frame = false;

            while !lost {
                tokio::select! {
                    () = &mut check => break,
                    frame = channel.next_frame() => match frame {
                        Some(Ok(text)) => {
                            saw_frame = true;
                            self.dispatch(&text).await;
                        }
                        Some(Err(e)) => {
                            tracing::error!(error = %e, "push connection error");
                            if self.config.notify_on_error {
                                self.notifier.notify(&format!("push connection error: {e}"));
                            }
                            lost = true;
                        }
                        None => {
                            tracing::info!("push connection closed by provider");
                            if self.config.notify_on_close {
                                self.notifier.notify("push connection closed");
                            }
                            lost = true;
                        }
                    }
                }
            }
            if lost {
                // Wait out the remainder of the interval before the
                // check observes the closed connection.
                check.await;
            }

            if lost || !channel.is_open() {
                return;
            }
            // The interval exceeds the provider heartbeat period, so a
            // silent interval means the link is dead even if the socket
            // never reported it.
            if !saw_frame {
                tracing::warn!("no frames within a supervision interval, connection presumed dead");
                return;
            }
            tracing::debug!("push connection healthy at supervision check");
        }
    }
}

#[async_trait]
impl EventSource for Dispatcher {
    fn attach(&self, handler: Arc<dyn MessageHandler>) {
        let mut handlers = self.handlers.write();
        if handlers.iter().any(|h| Arc::ptr_eq(h, &handler)) {
            tracing::warn!(handler = handler.name(), "handler already attached");
            return;
        }
        tracing::info!(handler = handler.name(), "handler attached");
        handlers.push(handler);
    }

    async fn start(&self) -> Result<()> {
        tracing::info!("authenticating with provider");
        self.provider.login().await?;

        tracing::info!("loading device directory");
        let records = self.provider.devices().await?;
        let directory = DeviceDirectory::from_records(records);
        tracing::info!(devices = directory.len(), "device directory built");
        let _ = self.directory.set(directory);

        self.attach_configured();

        self.supervise().await;
        Ok(())
    }
}
