// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process bootstrap.
//!
//! Wires configuration, provider client, notifier, and dispatcher
//! together and runs until killed. Startup failures are the one fatal
//! class: they are logged, reported to the notifier, and returned.

use std::sync::Arc;

use crate::config::MirrorConfig;
use crate::dispatch::{DispatchConfig, Dispatcher, EventSource};
use crate::error::{Error, Result};
use crate::notify::Notifier;
use crate::provider::ProviderConfig;

/// Builds the provider client and dispatcher from `config` and runs the
/// dispatch loop for the lifetime of the process.
///
/// # Errors
///
/// Returns an error only when startup fails (client construction,
/// authentication, directory load). The error is also reported through
/// `notifier` before returning.
pub async fn run(config: MirrorConfig, notifier: Arc<dyn Notifier>) -> Result<()> {
    let mut provider_config = ProviderConfig::new(&config.api_url, config.credentials.clone());
    if let Some(ws_url) = &config.ws_url {
        provider_config = provider_config.with_ws_url(ws_url);
    }

    let dispatcher = match provider_config.into_client() {
        Ok(client) => Dispatcher::new(
            Arc::new(client),
            config.handlers.clone(),
            notifier.clone(),
            DispatchConfig::from(&config),
        ),
        Err(e) => {
            let e = Error::from(e);
            tracing::error!(error = %e, "could not build provider client");
            notifier.notify(&format!("startup failed: {e}"));
            return Err(e);
        }
    };

    tracing::info!("starting dispatch");
    if let Err(e) = dispatcher.start().await {
        tracing::error!(error = %e, "startup failed");
        notifier.notify(&format!("startup failed: {e}"));
        return Err(e);
    }
    Ok(())
}
