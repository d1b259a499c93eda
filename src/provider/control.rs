// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Narrow power-control capability.
//!
//! Handlers act on devices through this two-method trait instead of the
//! full [`CloudClient`](super::CloudClient), keeping their dependency
//! surface small and easy to fake in tests.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{DeviceId, SwitchState};

/// Query and set a device's power state.
#[async_trait]
pub trait PowerControl: Send + Sync {
    /// Queries the authoritative power state of a device.
    ///
    /// Returns `Ok(None)` when the provider answers with something other
    /// than an exact on/off value; callers discard such replies.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Api`] for provider-reported error codes
    /// (including the "device offline" condition, see
    /// [`ProviderError::is_device_offline`]) and transport-level errors
    /// otherwise.
    async fn query_power_state(&self, id: &DeviceId)
    -> Result<Option<SwitchState>, ProviderError>;

    /// Issues a set-power-state command against a device.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Api`] when the provider rejects the
    /// command, or a transport-level error when the call itself fails.
    async fn set_power_state(
        &self,
        id: &DeviceId,
        state: SwitchState,
    ) -> Result<(), ProviderError>;
}
