// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identity types.
//!
//! The provider assigns every device an opaque string identifier. Events
//! and commands speak identifiers; configuration speaks human-readable
//! names. The [`DeviceDirectory`](crate::directory::DeviceDirectory)
//! translates between the two.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque provider device identifier.
///
/// Stable for the lifetime of a device registration; never interpreted
/// by this crate beyond equality.
///
/// # Examples
///
/// ```
/// use mirrorlink::types::DeviceId;
///
/// let id = DeviceId::from("10004533ae");
/// assert_eq!(id.as_str(), "10004533ae");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates a device id from a provider string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One entry of the provider's device listing.
///
/// Immutable once loaded; the listing is fetched once per process
/// lifetime, so renames or additions on the provider side require a
/// restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Provider device identifier.
    #[serde(rename = "deviceid")]
    pub id: DeviceId,
    /// Human-readable device name as configured at the provider.
    pub name: String,
}

impl DeviceRecord {
    /// Creates a record from an id and a name.
    #[must_use]
    pub fn new(id: impl Into<DeviceId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
