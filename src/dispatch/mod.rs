// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event dispatch and connection supervision.
//!
//! # Types
//!
//! - [`Dispatcher`] - Owns the push connection and the handler set
//! - [`EventSource`] - Attach-and-start capability
//! - [`DispatchConfig`] - Supervision interval and notification gating

mod dispatcher;

pub use dispatcher::{DispatchConfig, Dispatcher, EventSource};
