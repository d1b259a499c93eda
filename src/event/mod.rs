// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound push-event model.
//!
//! # Types
//!
//! - [`PushMessage`] - One defensively parsed frame from the push channel
//! - [`EventFrame`] - A structured event with `action` and `params`

mod message;

pub use message::{ACTION_SYSMSG, ACTION_UPDATE, EventFrame, PushMessage};
