// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the crate.
//!
//! # Types
//!
//! - [`SwitchState`] - On/off power state in provider wire form
//! - [`DeviceId`] - Opaque provider device identifier
//! - [`DeviceRecord`] - One entry of the provider device listing

mod device;
mod power;

pub use device::{DeviceId, DeviceRecord};
pub use power::SwitchState;
