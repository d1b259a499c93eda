// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switch power state as reported and accepted by the provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// The on/off state of a switch device.
///
/// The provider speaks lowercase `"on"` / `"off"` in both event payloads
/// and command bodies. Anything else (e.g. a dimmer level, an empty
/// string) is not a switch state and is rejected on parse.
///
/// # Examples
///
/// ```
/// use mirrorlink::types::SwitchState;
///
/// assert_eq!(SwitchState::On.as_str(), "on");
/// assert_eq!("off".parse::<SwitchState>().unwrap(), SwitchState::Off);
/// assert!("toggle".parse::<SwitchState>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchState {
    /// Power is on.
    On,
    /// Power is off.
    Off,
}

impl SwitchState {
    /// Returns the provider wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }

    /// Parses a provider value, returning `None` for anything that is not
    /// exactly on/off.
    ///
    /// Event payloads are not controlled by this crate, so unknown values
    /// are common and must be discardable without an error.
    #[must_use]
    pub fn from_provider(value: &str) -> Option<Self> {
        match value {
            "on" | "ON" | "On" => Some(Self::On),
            "off" | "OFF" | "Off" => Some(Self::Off),
            _ => None,
        }
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SwitchState {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_provider(s)
            .ok_or_else(|| ProviderError::UnexpectedResponse(format!("not a switch state: {s}")))
    }
}

impl From<bool> for SwitchState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}
