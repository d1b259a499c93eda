// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `mirrorlink` library.
//!
//! Failures fall into three groups: device-name resolution, provider API
//! calls (HTTP and reported error codes), and the push-event transport.
//! Malformed event frames are deliberately not an error anywhere - they
//! are discarded at debug level, because the event stream is not under
//! this crate's control.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred resolving a device name or id.
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Error occurred talking to the provider API.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error occurred on the push-event transport.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Errors from the device directory.
///
/// A configured name missing from the directory is fatal to constructing
/// the one handler that references it, never to the process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// A device name was not present in the provider listing.
    #[error("device not found: {0}")]
    DeviceNotFound(String),
}

/// Errors from the provider device-control API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication against the provider failed.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The provider reported an error code in a response body.
    #[error("provider error {code}: {message}")]
    Api {
        /// Provider error code.
        code: i64,
        /// Provider error message.
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Provider error code meaning the target device is unreachable.
///
/// Expected race after an online-transition event: the device may have
/// dropped off again before the state query lands. Swallowed, not
/// reported.
pub const DEVICE_OFFLINE_CODE: i64 = 503;

impl ProviderError {
    /// Returns true if this is the provider's "device offline" condition.
    #[must_use]
    pub fn is_device_offline(&self) -> bool {
        matches!(self, Self::Api { code, .. } if *code == DEVICE_OFFLINE_CODE)
    }
}

/// Errors from the push-event connection.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Opening the connection failed.
    #[error("connection failed: {0}")]
    Connect(String),

    /// A protocol-level socket error.
    #[error("socket error: {0}")]
    Socket(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
