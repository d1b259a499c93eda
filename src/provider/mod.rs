// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Provider device-control API.
//!
//! The vendor API is consumed as an opaque capability set: authenticate,
//! enumerate devices, query a power state, set a power state, and open
//! the persistent push-event channel. [`CloudClient`] implements all of
//! them; the narrow [`PowerControl`] and [`EventLink`] traits are the
//! seams handlers and the dispatcher actually depend on.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::DeviceRecord;

mod channel;
mod client;
mod control;

pub use channel::{EventChannel, EventLink, WsEventChannel};
pub use client::{CloudClient, Credentials, ProviderConfig};
pub use control::PowerControl;

/// Everything the dispatcher needs from the provider.
///
/// One authenticated session covers device control, the push channel,
/// and the one-time device listing fetched at startup.
#[async_trait]
pub trait ProviderSession: PowerControl + EventLink {
    /// Authenticates and establishes the session.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::AuthenticationFailed`] on rejected
    /// credentials, or a transport error.
    async fn login(&self) -> Result<(), ProviderError>;

    /// Enumerates the account's devices.
    ///
    /// # Errors
    ///
    /// Returns a provider or transport error.
    async fn devices(&self) -> Result<Vec<DeviceRecord>, ProviderError>;
}
