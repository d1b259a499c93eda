// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bidirectional device name/id lookup.
//!
//! Built once from the provider device listing during startup and never
//! mutated afterward. The directory is not refreshed: a device rename or
//! addition on the provider side requires a process restart.

use std::collections::HashMap;

use crate::error::DirectoryError;
use crate::types::{DeviceId, DeviceRecord};

/// Name returned by [`DeviceDirectory::resolve_name`] for ids the
/// directory never saw. Inbound events may reference devices outside the
/// listing, so an unknown id is not an error.
pub const UNKNOWN_DEVICE: &str = "unknown";

/// Read-only name↔id lookup built from a provider device listing.
///
/// The build is a pure reduction over the input records. Duplicate names
/// or ids later in the input silently overwrite earlier entries
/// (last-write-wins); the displaced half of any older pair is removed so
/// the two directions always agree.
///
/// # Examples
///
/// ```
/// use mirrorlink::directory::DeviceDirectory;
/// use mirrorlink::types::{DeviceId, DeviceRecord};
///
/// let directory = DeviceDirectory::from_records([
///     DeviceRecord::new("1000abc", "Desk Lamp"),
///     DeviceRecord::new("1000def", "Hall Light"),
/// ]);
///
/// assert_eq!(directory.resolve("Desk Lamp").unwrap(), &DeviceId::from("1000abc"));
/// assert_eq!(directory.resolve_name(&DeviceId::from("1000def")), "Hall Light");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeviceDirectory {
    by_name: HashMap<String, DeviceId>,
    by_id: HashMap<DeviceId, String>,
}

impl DeviceDirectory {
    /// Builds a directory from a sequence of device records.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = DeviceRecord>) -> Self {
        let mut directory = Self::default();
        for record in records {
            directory.insert(record);
        }
        directory
    }

    /// Inserts one record, displacing any older pair sharing its name or id.
    fn insert(&mut self, record: DeviceRecord) {
        if let Some(old_id) = self.by_name.remove(&record.name) {
            self.by_id.remove(&old_id);
        }
        if let Some(old_name) = self.by_id.remove(&record.id) {
            self.by_name.remove(&old_name);
        }
        self.by_name.insert(record.name.clone(), record.id.clone());
        self.by_id.insert(record.id, record.name);
    }

    /// Resolves a human-readable device name to its provider id.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::DeviceNotFound`] for names absent from
    /// the listing.
    pub fn resolve(&self, name: &str) -> Result<&DeviceId, DirectoryError> {
        self.by_name
            .get(name)
            .ok_or_else(|| DirectoryError::DeviceNotFound(name.to_string()))
    }

    /// Resolves a provider id back to its name.
    ///
    /// Unknown ids yield the [`UNKNOWN_DEVICE`] sentinel rather than an
    /// error: this direction is used for logging inbound events, and the
    /// event stream may carry devices the listing never contained.
    #[must_use]
    pub fn resolve_name(&self, id: &DeviceId) -> &str {
        self.by_id.get(id).map_or(UNKNOWN_DEVICE, String::as_str)
    }

    /// Returns the number of devices in the directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if the directory holds no devices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
